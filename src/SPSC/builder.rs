use std::sync::Arc;

use super::{BackoffPolicy, BoundedQueue, Consumer, Producer};
use crate::Core::error::QueueResult;
use crate::SPSC::Buffer::{DEFAULT_CAPACITY, MAX_RECORD_SIZE};
use crate::SPSC::Wait::WaitStrategy;

#[derive(Clone, Debug)]
pub struct QueueBuilder {
    capacity: usize,
    max_record_size: usize,
    strategy: WaitStrategy,
    backoff: BackoffPolicy,
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_record_size: MAX_RECORD_SIZE,
            strategy: WaitStrategy::Condvar,
            backoff: BackoffPolicy::Immediate,
        }
    }
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_record_size(mut self, size: usize) -> Self {
        self.max_record_size = size;
        self
    }

    pub fn with_wait_strategy(mut self, strategy: WaitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Policy handed to the producer built by `build_pair`.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn build(self) -> QueueResult<Arc<BoundedQueue>> {
        let queue = BoundedQueue::new(self.capacity, self.max_record_size, self.strategy)?;
        Ok(Arc::new(queue))
    }

    pub fn build_pair(self) -> QueueResult<(Producer, Consumer)> {
        let backoff = self.backoff;
        let queue = self.build()?;
        Ok((
            Producer::new(Arc::clone(&queue), backoff),
            Consumer::new(queue),
        ))
    }
}
