// This is the circular record buffer behind BoundedQueue - one per queue

/// Default upper bound on a single record, in bytes.
pub const MAX_RECORD_SIZE: usize = 128;

/// Default number of slots.
pub const DEFAULT_CAPACITY: usize = 100;

/// A single slot in the ring.
///
/// The byte storage is allocated once at construction with room for
/// `max_record_size` bytes; `len` says how much of it is live.
pub struct Slot {
    /// Length of the record currently stored (stale once the slot is popped).
    pub(crate) len: usize,

    /// Inline payload storage, never reallocated.
    pub(crate) bytes: Box<[u8]>,
}

/// Fixed-capacity circular buffer of records.
///
/// This struct has no synchronization of its own. `BoundedQueue` keeps it
/// behind a mutex and every method here is called with that lock held.
///
/// ### Invariants
/// - `count <= capacity`
/// - `tail == (head + count) % capacity`
/// - exactly the slots in `[head, head + count)` (mod capacity) are live
pub struct Ring {
    pub(crate) slots: Box<[Slot]>,

    /// Index of the oldest live record.
    pub(crate) head: usize,

    /// Index the next record will be written to.
    pub(crate) tail: usize,

    /// Number of live records.
    pub(crate) count: usize,

    pub(crate) max_record_size: usize,
}
