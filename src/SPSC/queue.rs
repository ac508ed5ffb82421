// src/SPSC/queue.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, MutexGuard};

use crate::Core::error::{QueueError, QueueResult};
use crate::SPSC::Buffer::Ring;
use crate::SPSC::Structs::Record;
use crate::SPSC::Wait::{self, WaitPrimitive, WaitStrategy};

/// Fixed-capacity command queue shared by one producer and one consumer.
///
/// ### Concurrency Design:
/// - **Ring**: head, tail, count and slot bytes live in a single `Ring` behind
///   a mutex. Nothing touches them without the lock.
/// - **Push**: copy into the tail slot, then notify the wait primitive while
///   still holding the lock.
/// - **Pop**: never blocks. Blocking consumers call one of the `wait_*`
///   methods first and treat a post-wake `QueueEmpty` as "nothing yet".
/// - **Cancellation**: `cancel` makes every current and future wait return
///   `Cancelled`. Push and pop keep working so the consumer can drain.
pub struct BoundedQueue {
    ring: Mutex<Ring>,
    waiter: Box<dyn WaitPrimitive>,
    cancelled: AtomicBool,
    capacity: usize,
    max_record_size: usize,
}

impl BoundedQueue {
    pub(crate) fn new(
        capacity: usize,
        max_record_size: usize,
        strategy: WaitStrategy,
    ) -> QueueResult<Self> {
        Self::assemble(capacity, max_record_size, || Wait::make(strategy))
    }

    /// Validates the configuration and allocates the ring before the wait
    /// primitive, so a bad config never creates kernel objects.
    fn assemble<F>(capacity: usize, max_record_size: usize, make_waiter: F) -> QueueResult<Self>
    where
        F: FnOnce() -> QueueResult<Box<dyn WaitPrimitive>>,
    {
        if capacity == 0 {
            return Err(QueueError::invalid("capacity must be greater than zero"));
        }
        if max_record_size == 0 {
            return Err(QueueError::invalid("max record size must be greater than zero"));
        }
        if capacity.checked_mul(max_record_size).is_none() {
            return Err(QueueError::invalid(format!(
                "capacity {} x max record size {} overflows",
                capacity, max_record_size
            )));
        }

        let ring = Ring::new(capacity, max_record_size)?;
        Ok(Self {
            ring: Mutex::new(ring),
            waiter: make_waiter()?,
            cancelled: AtomicBool::new(false),
            capacity,
            max_record_size,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_waiter(
        capacity: usize,
        max_record_size: usize,
        waiter: Box<dyn WaitPrimitive>,
    ) -> QueueResult<Self> {
        Self::assemble(capacity, max_record_size, || Ok(waiter))
    }

    /// Copies `payload` into the queue and wakes the consumer.
    ///
    /// # Returns
    /// * `Ok(len)` once the record is stored
    /// * `Err(QueueFull)` if `capacity` records are already queued
    /// * `Err(InvalidArgument)` for an empty or oversized payload
    /// * `Err(SignalFailure)` if the record was stored but the wakeup could
    ///   not be delivered
    pub fn push(&self, payload: &[u8]) -> QueueResult<usize> {
        if payload.is_empty() {
            return Err(QueueError::invalid("payload must not be empty"));
        }
        if payload.len() > self.max_record_size {
            return Err(QueueError::invalid(format!(
                "payload too large ({} > {})",
                payload.len(),
                self.max_record_size
            )));
        }

        let mut ring = self.ring.lock();
        if ring.enqueue(payload).is_none() {
            return Err(QueueError::QueueFull);
        }
        self.waiter.notify()?;
        Ok(payload.len())
    }

    /// Copies the oldest record into `out` without blocking.
    ///
    /// Fails with `InvalidArgument` and consumes nothing if `out` is shorter
    /// than the record.
    pub fn pop(&self, out: &mut [u8]) -> QueueResult<usize> {
        let mut ring = self.ring.lock();

        let len = ring.peek_len().ok_or(QueueError::QueueEmpty)?;
        if out.len() < len {
            return Err(QueueError::invalid(format!(
                "output buffer too small ({} < {})",
                out.len(),
                len
            )));
        }
        ring.dequeue_into(out).ok_or(QueueError::QueueEmpty)
    }

    /// Owning variant of [`pop`](Self::pop).
    pub fn pop_record(&self) -> QueueResult<Record> {
        self.ring
            .lock()
            .dequeue()
            .map(Record::from)
            .ok_or(QueueError::QueueEmpty)
    }

    /// Blocks until a record is present or the queue is cancelled.
    pub fn wait_indefinite(&self) -> QueueResult<()> {
        self.waiter.wait(&self.ring, &self.cancelled, None)
    }

    /// Blocks until a record is present, bounded by `timeout` in total.
    ///
    /// The deadline is fixed on entry; wakeups that find the queue empty do
    /// not extend it.
    pub fn wait_timeout(&self, timeout: Duration) -> QueueResult<()> {
        // An unrepresentable deadline is as good as none.
        let deadline = Instant::now().checked_add(timeout);
        self.waiter.wait(&self.ring, &self.cancelled, deadline)
    }

    /// True iff at least one record is queued right now.
    pub fn poll(&self) -> bool {
        !self.ring.lock().is_empty()
    }

    /// Makes every current and future wait return `Cancelled`.
    pub fn cancel(&self) -> QueueResult<()> {
        self.cancelled.store(true, Ordering::Release);
        self.waiter.cancel(&self.ring)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Wakes blocked waiters without publishing a record.
    ///
    /// Waiters must go back to sleep; this exists to exercise that path.
    pub fn wake_waiters(&self) -> QueueResult<()> {
        self.waiter.wake_all(&self.ring)
    }

    /// Tears the queue down.
    ///
    /// Only succeeds when `this` is the last handle, i.e. both producer and
    /// consumer have let go of it.
    pub fn shutdown(this: Arc<Self>) -> QueueResult<()> {
        match Arc::try_unwrap(this) {
            Ok(queue) => {
                drop(queue);
                Ok(())
            }
            Err(shared) => Err(QueueError::InUse {
                refs: Arc::strong_count(&shared) - 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_record_size(&self) -> usize {
        self.max_record_size
    }

    pub fn wait_strategy(&self) -> WaitStrategy {
        self.waiter.strategy()
    }

    pub(crate) fn try_ring(&self) -> Option<MutexGuard<'_, Ring>> {
        self.ring.try_lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SPSC::{BackoffPolicy, Producer};
    use std::io;

    /// Stores records like any primitive but can never deliver the wakeup.
    struct FailingNotify;

    impl WaitPrimitive for FailingNotify {
        fn strategy(&self) -> WaitStrategy {
            WaitStrategy::Condvar
        }

        fn notify(&self) -> QueueResult<()> {
            Err(QueueError::SignalFailure(io::Error::new(
                io::ErrorKind::Other,
                "notification channel unavailable",
            )))
        }

        fn wake_all(&self, _ring: &Mutex<Ring>) -> QueueResult<()> {
            Ok(())
        }

        fn cancel(&self, _ring: &Mutex<Ring>) -> QueueResult<()> {
            Ok(())
        }

        fn wait(
            &self,
            ring: &Mutex<Ring>,
            _cancelled: &AtomicBool,
            _deadline: Option<Instant>,
        ) -> QueueResult<()> {
            if ring.lock().is_empty() {
                Err(QueueError::TimedOut)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn signal_failure_keeps_record_enqueued() {
        let queue = BoundedQueue::with_waiter(4, 8, Box::new(FailingNotify)).unwrap();

        assert!(matches!(queue.push(b"cmd"), Err(QueueError::SignalFailure(_))));
        assert_eq!(queue.len(), 1);
        assert!(queue.poll());
        assert_eq!(queue.pop_record().unwrap().as_bytes(), b"cmd");
        assert!(queue.is_empty());
    }

    #[test]
    fn producer_counts_signal_failure_as_sent() {
        let queue = Arc::new(BoundedQueue::with_waiter(4, 8, Box::new(FailingNotify)).unwrap());
        let producer = Producer::new(Arc::clone(&queue), BackoffPolicy::Immediate);

        assert!(matches!(producer.send(b"abc"), Err(QueueError::SignalFailure(_))));
        assert_eq!(producer.sent(), 1);
        assert_eq!(producer.dropped(), 0);
        assert_eq!(queue.pop_record().unwrap().as_bytes(), b"abc");
    }

    #[test]
    fn oversized_config_is_rejected_before_allocating() {
        let res = BoundedQueue::with_waiter(usize::MAX, 2, Box::new(FailingNotify));
        assert!(matches!(res, Err(QueueError::InvalidArgument(_))));
    }
}
