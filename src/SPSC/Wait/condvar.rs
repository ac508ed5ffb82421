use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use super::{WaitPrimitive, WaitStrategy};
use crate::Core::error::{QueueError, QueueResult};
use crate::SPSC::Buffer::Ring;

/// Condition-variable wait on the ring's own mutex.
#[derive(Debug, Default)]
pub struct CondvarWait {
    data_ready: Condvar,
}

impl CondvarWait {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WaitPrimitive for CondvarWait {
    fn strategy(&self) -> WaitStrategy {
        WaitStrategy::Condvar
    }

    fn notify(&self) -> QueueResult<()> {
        self.data_ready.notify_one();
        Ok(())
    }

    fn wake_all(&self, ring: &Mutex<Ring>) -> QueueResult<()> {
        let _guard = ring.lock();
        self.data_ready.notify_all();
        Ok(())
    }

    fn cancel(&self, ring: &Mutex<Ring>) -> QueueResult<()> {
        // Taking the lock orders the flag store before any waiter's next
        // predicate check, so nobody can miss it between check and park.
        self.wake_all(ring)
    }

    fn wait(
        &self,
        ring: &Mutex<Ring>,
        cancelled: &AtomicBool,
        deadline: Option<Instant>,
    ) -> QueueResult<()> {
        let mut guard = ring.lock();
        loop {
            if cancelled.load(Ordering::Acquire) {
                return Err(QueueError::Cancelled);
            }
            if !guard.is_empty() {
                return Ok(());
            }
            match deadline {
                None => self.data_ready.wait(&mut guard),
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        return Err(QueueError::TimedOut);
                    }
                    // The timeout result is not trusted; the loop re-checks
                    // the ring and the clock against the same deadline.
                    let _ = self.data_ready.wait_until(&mut guard, deadline);
                }
            }
        }
    }
}
