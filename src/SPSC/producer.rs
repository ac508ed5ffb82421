// In src/SPSC/producer.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{BackoffPolicy, BoundedQueue};
use crate::Core::error::{QueueError, QueueResult};

/// The sending half of a queue.
///
/// Wraps the shared queue with a backoff policy and counts what it managed
/// to enqueue and what it had to drop.
pub struct Producer {
    queue: Arc<BoundedQueue>,
    backoff: BackoffPolicy,
    sent: AtomicU64,
    dropped: AtomicU64,
}

impl Producer {
    pub fn new(queue: Arc<BoundedQueue>, backoff: BackoffPolicy) -> Self {
        Self {
            queue,
            backoff,
            sent: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Sends a command, retrying on `QueueFull` as the backoff policy allows.
    ///
    /// # Returns
    /// * `Ok(len)` if the command was enqueued
    /// * `Err(QueueFull)` if the policy ran out; the command counts as dropped
    /// * `Err(SignalFailure)` if the command was enqueued but the consumer may
    ///   not have been woken; it counts as sent
    pub fn send<T: AsRef<[u8]>>(&self, message: T) -> QueueResult<usize> {
        let message = message.as_ref();
        let result = self.backoff.run(|| self.queue.push(message));
        self.account(&result);
        result
    }

    /// Sends a command once, without backoff.
    pub fn try_send<T: AsRef<[u8]>>(&self, message: T) -> QueueResult<usize> {
        let result = self.queue.push(message.as_ref());
        self.account(&result);
        result
    }

    fn account(&self, result: &QueueResult<usize>) {
        match result {
            Ok(_) | Err(QueueError::SignalFailure(_)) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
            }
            Err(QueueError::QueueFull) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {}
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Returns the maximum command size that can be sent
    pub fn max_message_size(&self) -> usize {
        self.queue.max_record_size()
    }

    pub fn queue(&self) -> &Arc<BoundedQueue> {
        &self.queue
    }
}
