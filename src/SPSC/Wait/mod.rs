//! Blocking on "the queue has data".
//!
//! Two interchangeable realizations sit behind [`WaitPrimitive`]:
//! - [`CondvarWait`]: a condition variable waited on under the ring's own lock.
//! - [`EventFdWait`]: a level-triggered eventfd counter, bumped on every push
//!   and drained by the waiter, polled entirely outside the ring lock (Linux).
//!
//! Both only report readiness. Data is always fetched with a separate pop,
//! and every wait loop re-checks the ring after waking, so spurious or stale
//! wakeups are harmless.

mod condvar;
#[cfg(target_os = "linux")]
mod eventfd;

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use parking_lot::Mutex;

use crate::Core::error::QueueResult;
use crate::SPSC::Buffer::Ring;

pub use condvar::CondvarWait;
#[cfg(target_os = "linux")]
pub use eventfd::EventFdWait;

/// Selects the wait primitive at construction time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WaitStrategy {
    #[default]
    Condvar,
    EventFd,
}

impl WaitStrategy {
    /// Every strategy usable on the current target.
    pub fn available() -> &'static [WaitStrategy] {
        #[cfg(target_os = "linux")]
        {
            &[WaitStrategy::Condvar, WaitStrategy::EventFd]
        }
        #[cfg(not(target_os = "linux"))]
        {
            &[WaitStrategy::Condvar]
        }
    }
}

impl fmt::Display for WaitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitStrategy::Condvar => f.write_str("condvar"),
            WaitStrategy::EventFd => f.write_str("eventfd"),
        }
    }
}

/// The notify/wait half of a `BoundedQueue`.
///
/// The ring mutex is passed in rather than owned so that the condvar form can
/// wait on the very lock that guards the predicate.
pub trait WaitPrimitive: Send + Sync {
    fn strategy(&self) -> WaitStrategy;

    /// Called with the ring lock held, right after a record was stored.
    fn notify(&self) -> QueueResult<()>;

    /// Wake every blocked waiter without publishing anything.
    /// Called without the ring lock held.
    fn wake_all(&self, ring: &Mutex<Ring>) -> QueueResult<()>;

    /// Wake every current and future waiter so it observes `cancelled`.
    /// The flag is already set when this runs; called without the ring lock held.
    fn cancel(&self, ring: &Mutex<Ring>) -> QueueResult<()>;

    /// Block until the ring is non-empty, `cancelled` is set, or `deadline` passes.
    ///
    /// `None` waits without bound. Returns `Ok(())` only after observing a
    /// non-empty ring under its lock.
    fn wait(
        &self,
        ring: &Mutex<Ring>,
        cancelled: &AtomicBool,
        deadline: Option<Instant>,
    ) -> QueueResult<()>;
}

pub(crate) fn make(strategy: WaitStrategy) -> QueueResult<Box<dyn WaitPrimitive>> {
    match strategy {
        WaitStrategy::Condvar => Ok(Box::new(CondvarWait::new())),
        #[cfg(target_os = "linux")]
        WaitStrategy::EventFd => Ok(Box::new(EventFdWait::new()?)),
        #[cfg(not(target_os = "linux"))]
        WaitStrategy::EventFd => Err(crate::Core::error::QueueError::Init(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "eventfd wait strategy requires Linux",
        ))),
    }
}
