use std::fmt;
use crate::SPSC::Buffer::Ring;
use crate::SPSC::{BoundedQueue, Consumer, Producer};

/// Debug function for BoundedQueue
///
/// Shows the fixed configuration plus a snapshot of the ring. The ring is
/// only inspected if its lock is free, so formatting a queue from inside a
/// critical section cannot deadlock.
pub fn debug_bounded_queue(queue: &BoundedQueue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = f.debug_struct("BoundedQueue");
    s.field("capacity", &queue.capacity())
        .field("max_record_size", &queue.max_record_size())
        .field("wait_strategy", &queue.wait_strategy())
        .field("cancelled", &queue.is_cancelled());
    match queue.try_ring() {
        Some(ring) => s.field("ring", &*ring),
        None => s.field("ring", &"<locked>"),
    };
    s.finish()
}

/// Debug function for Ring
///
/// Prints cursors and occupancy, never slot contents.
pub fn debug_ring(ring: &Ring, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Ring")
        .field("head", &ring.head)
        .field("tail", &ring.tail)
        .field("count", &ring.count)
        .field("capacity", &ring.capacity())
        .finish_non_exhaustive()
}

pub fn debug_producer(producer: &Producer, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Producer")
        .field("backoff", &producer.backoff())
        .field("sent", &producer.sent())
        .field("dropped", &producer.dropped())
        .finish()
}

pub fn debug_consumer(consumer: &Consumer, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Consumer")
        .field("received", &consumer.received())
        .field("queued", &consumer.queue().len())
        .finish()
}
