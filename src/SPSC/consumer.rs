// src/SPSC/consumer.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::BoundedQueue;
use crate::Core::error::{QueueError, QueueResult};
use crate::SPSC::Structs::Record;

/// The receiving half of a queue.
///
/// Layers blocking receives on top of the non-blocking pop: wait for
/// readiness, then pop, and go round again if the pop comes back empty.
pub struct Consumer {
    queue: Arc<BoundedQueue>,
    received: AtomicU64,
}

impl Consumer {
    pub fn new(queue: Arc<BoundedQueue>) -> Self {
        Self {
            queue,
            received: AtomicU64::new(0),
        }
    }

    /// Receives a command if one is available.
    ///
    /// # Returns
    /// * `Ok(Some(record))` if a command was received
    /// * `Ok(None)` if the queue is empty
    pub fn receive(&self) -> QueueResult<Option<Record>> {
        match self.queue.pop_record() {
            Ok(record) => {
                self.received.fetch_add(1, Ordering::Relaxed);
                Ok(Some(record))
            }
            Err(QueueError::QueueEmpty) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Receives a command, blocking until one is available.
    ///
    /// Returns `Err(Cancelled)` only once the queue is both cancelled and
    /// empty, so records enqueued before cancellation are still delivered.
    pub fn receive_blocking(&self) -> QueueResult<Record> {
        loop {
            if let Some(record) = self.receive()? {
                return Ok(record);
            }
            self.wait(None)?;
        }
    }

    /// Receives a command, waiting up to `timeout` in total.
    ///
    /// # Returns
    /// * `Ok(record)` if a command arrived in time
    /// * `Err(TimedOut)` if the deadline passed with the queue empty
    /// * `Err(Cancelled)` if the queue was cancelled and is empty
    pub fn receive_timeout(&self, timeout: Duration) -> QueueResult<Record> {
        let deadline = Instant::now().checked_add(timeout);

        loop {
            if let Some(record) = self.receive()? {
                return Ok(record);
            }
            let remaining = match deadline {
                None => None,
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(QueueError::TimedOut);
                    }
                    Some(remaining)
                }
            };
            self.wait(remaining)?;
        }
    }

    /// Waits for readiness. Cancellation is held back while records remain,
    /// so the caller's next pop drains them first.
    fn wait(&self, timeout: Option<Duration>) -> QueueResult<()> {
        let result = match timeout {
            None => self.queue.wait_indefinite(),
            Some(timeout) => self.queue.wait_timeout(timeout),
        };
        match result {
            Err(QueueError::Cancelled) if self.queue.poll() => Ok(()),
            other => other,
        }
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn queue(&self) -> &Arc<BoundedQueue> {
        &self.queue
    }
}
