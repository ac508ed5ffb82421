use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::Mutex;

use super::{WaitPrimitive, WaitStrategy};
use crate::Core::error::{QueueError, QueueResult};
use crate::Core::eventfd::{wait_any, EventFd};
use crate::SPSC::Buffer::Ring;

/// Level-triggered eventfd wait.
///
/// `data` is bumped once per push and drained by whichever waiter wakes.
/// `cancelled` is written once and never drained, so it keeps every poller
/// awake after cancellation regardless of how many are blocked.
#[derive(Debug)]
pub struct EventFdWait {
    data: EventFd,
    cancelled: EventFd,
}

impl EventFdWait {
    pub fn new() -> QueueResult<Self> {
        Ok(Self {
            data: EventFd::new().map_err(QueueError::Init)?,
            cancelled: EventFd::new().map_err(QueueError::Init)?,
        })
    }
}

impl WaitPrimitive for EventFdWait {
    fn strategy(&self) -> WaitStrategy {
        WaitStrategy::EventFd
    }

    fn notify(&self) -> QueueResult<()> {
        self.data.signal().map_err(QueueError::SignalFailure)
    }

    fn wake_all(&self, _ring: &Mutex<Ring>) -> QueueResult<()> {
        self.data.signal().map_err(QueueError::SignalFailure)
    }

    fn cancel(&self, _ring: &Mutex<Ring>) -> QueueResult<()> {
        self.cancelled.signal().map_err(QueueError::SignalFailure)
    }

    fn wait(
        &self,
        ring: &Mutex<Ring>,
        cancelled: &AtomicBool,
        deadline: Option<Instant>,
    ) -> QueueResult<()> {
        loop {
            if cancelled.load(Ordering::Acquire) {
                return Err(QueueError::Cancelled);
            }
            if !ring.lock().is_empty() {
                return Ok(());
            }

            let remaining = match deadline {
                None => None,
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(QueueError::TimedOut);
                    }
                    Some(deadline - now)
                }
            };

            // A push between the ring check above and this poll leaves the
            // counter non-zero, so the poll returns at once.
            match wait_any(&[&self.data, &self.cancelled], remaining) {
                Ok(true) => {
                    self.data.drain().map_err(QueueError::SignalFailure)?;
                }
                Ok(false) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(QueueError::SignalFailure(e)),
            }
        }
    }
}
