use std::collections::TryReserveError;
use std::io;

use super::Buffer::{Ring, Slot};
use crate::Core::error::{QueueError, QueueResult};

fn out_of_memory(err: TryReserveError) -> QueueError {
    QueueError::Init(io::Error::new(io::ErrorKind::OutOfMemory, err))
}

impl Ring {
    /// Allocate `capacity` slots of `max_record_size` bytes each.
    ///
    /// Callers validate that both values are non-zero and that their product
    /// fits in `usize`. An allocation the system refuses is reported as `Init`
    /// instead of aborting.
    pub fn new(capacity: usize, max_record_size: usize) -> QueueResult<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity).map_err(out_of_memory)?;
        for _ in 0..capacity {
            let mut bytes = Vec::new();
            bytes.try_reserve_exact(max_record_size).map_err(out_of_memory)?;
            bytes.resize(max_record_size, 0u8);
            slots.push(Slot {
                len: 0,
                bytes: bytes.into_boxed_slice(),
            });
        }

        Ok(Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
            count: 0,
            max_record_size,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    #[inline]
    pub fn max_record_size(&self) -> usize {
        self.max_record_size
    }

    /// Length of the oldest record, if any.
    #[inline]
    pub fn peek_len(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.slots[self.head].len)
        }
    }

    /// Copy `payload` into the tail slot.
    /// Returns the slot index on success, or None if the ring is full.
    ///
    /// `payload.len()` must not exceed `max_record_size`.
    pub fn enqueue(&mut self, payload: &[u8]) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        debug_assert!(payload.len() <= self.max_record_size);

        let idx = self.tail;
        let slot = &mut self.slots[idx];
        slot.bytes[..payload.len()].copy_from_slice(payload);
        slot.len = payload.len();

        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;
        self.check_invariants();
        Some(idx)
    }

    /// Copy the head record into `out` and release its slot.
    /// Returns the record length, or None if the ring is empty.
    ///
    /// `out` must be at least `peek_len()` bytes long.
    pub fn dequeue_into(&mut self, out: &mut [u8]) -> Option<usize> {
        let len = self.peek_len()?;
        out[..len].copy_from_slice(&self.slots[self.head].bytes[..len]);
        self.advance_head();
        Some(len)
    }

    /// Owning variant of `dequeue_into`.
    pub fn dequeue(&mut self) -> Option<Vec<u8>> {
        let len = self.peek_len()?;
        let payload = self.slots[self.head].bytes[..len].to_vec();
        self.advance_head();
        Some(payload)
    }

    fn advance_head(&mut self) {
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        self.check_invariants();
    }

    #[inline]
    fn check_invariants(&self) {
        debug_assert!(self.count <= self.capacity());
        debug_assert_eq!(self.tail, (self.head + self.count) % self.capacity());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_wrap_around() {
        let mut ring = Ring::new(3, 8).unwrap();
        for round in 0..10u8 {
            assert_eq!(ring.enqueue(&[round; 4]), Some(round as usize % 3));
            assert_eq!(ring.dequeue(), Some(vec![round; 4]));
            assert_eq!(ring.head, ring.tail);
            assert!(ring.is_empty());
        }
        assert_eq!(ring.head, 10 % 3);
    }

    #[test]
    fn full_ring_rejects_without_touching_state() {
        let mut ring = Ring::new(2, 4).unwrap();
        assert!(ring.enqueue(b"ab").is_some());
        assert!(ring.enqueue(b"cd").is_some());
        let (head, tail) = (ring.head, ring.tail);
        assert!(ring.enqueue(b"ef").is_none());
        assert_eq!((ring.head, ring.tail, ring.count), (head, tail, 2));
        assert_eq!(ring.dequeue().as_deref(), Some(&b"ab"[..]));
    }

    #[test]
    fn stale_bytes_do_not_leak_into_shorter_record() {
        let mut ring = Ring::new(1, 8).unwrap();
        ring.enqueue(&[0xAA; 8]).unwrap();
        ring.dequeue().unwrap();
        ring.enqueue(&[0x01, 0x02]).unwrap();

        let mut out = [0u8; 8];
        assert_eq!(ring.dequeue_into(&mut out), Some(2));
        assert_eq!(&out[..2], &[0x01, 0x02]);
        assert_eq!(ring.peek_len(), None);
    }

    #[test]
    fn refused_allocation_is_an_error() {
        assert!(matches!(Ring::new(1, usize::MAX), Err(QueueError::Init(_))));
        assert!(matches!(Ring::new(usize::MAX, 1), Err(QueueError::Init(_))));
    }
}
