use std::thread;
use std::time::Duration;

use crossbeam_utils::Backoff;

use crate::Core::error::{QueueError, QueueResult};

/// What a producer does when the queue reports `QueueFull`.
///
/// The queue itself never retries; the policy lives with the caller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BackoffPolicy {
    /// Give up on the first `QueueFull`.
    #[default]
    Immediate,

    /// Sleep `delay` between attempts.
    Fixed { delay: Duration, max_retries: u32 },

    /// Sleep `initial`, doubling each attempt up to `max_delay`.
    Exponential {
        initial: Duration,
        max_delay: Duration,
        max_retries: u32,
    },

    /// Spin, then yield, until `crossbeam_utils::Backoff` reports completion.
    Spin,
}

impl BackoffPolicy {
    /// Runs `attempt` until it succeeds, fails with something other than
    /// `QueueFull`, or the policy is exhausted (returning the last `QueueFull`).
    pub fn run<T, F>(&self, mut attempt: F) -> QueueResult<T>
    where
        F: FnMut() -> QueueResult<T>,
    {
        match *self {
            BackoffPolicy::Immediate => attempt(),
            BackoffPolicy::Fixed { delay, max_retries } => {
                let mut retries = 0;
                loop {
                    match attempt() {
                        Err(QueueError::QueueFull) if retries < max_retries => {
                            retries += 1;
                            thread::sleep(delay);
                        }
                        other => return other,
                    }
                }
            }
            BackoffPolicy::Exponential {
                initial,
                max_delay,
                max_retries,
            } => {
                let mut retries = 0;
                let mut delay = initial;
                loop {
                    match attempt() {
                        Err(QueueError::QueueFull) if retries < max_retries => {
                            retries += 1;
                            thread::sleep(delay);
                            delay = delay.saturating_mul(2).min(max_delay);
                        }
                        other => return other,
                    }
                }
            }
            BackoffPolicy::Spin => {
                let backoff = Backoff::new();
                loop {
                    match attempt() {
                        Err(QueueError::QueueFull) if !backoff.is_completed() => backoff.snooze(),
                        other => return other,
                    }
                }
            }
        }
    }
}
