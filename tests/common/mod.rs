#![allow(dead_code)]

use std::sync::Arc;

use dmxp_cmdqueue::{BoundedQueue, QueueBuilder, WaitStrategy};

pub fn make_queue(strategy: WaitStrategy, capacity: usize, max_record_size: usize) -> Arc<BoundedQueue> {
    QueueBuilder::new()
        .with_capacity(capacity)
        .with_max_record_size(max_record_size)
        .with_wait_strategy(strategy)
        .build()
        .unwrap()
}

/// Runs `f` once per wait strategy available on this target.
pub fn for_each_strategy(mut f: impl FnMut(WaitStrategy)) {
    for &strategy in WaitStrategy::available() {
        f(strategy);
    }
}
