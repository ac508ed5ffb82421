use crate::Core::error::QueueError;
use crate::SPSC::Wait::WaitStrategy;
use crate::SPSC::{BoundedQueue, QueueBuilder};
use std::sync::Arc;
use std::time::Duration;
use std::ptr;

// Error codes
pub const CMDQ_SUCCESS: i32 = 0;
pub const CMDQ_ERROR_NULL_POINTER: i32 = -1;
pub const CMDQ_ERROR_INVALID_ARG: i32 = -2;
pub const CMDQ_ERROR_ALLOCATION_FAILED: i32 = -3;
pub const CMDQ_ERROR_QUEUE_FULL: i32 = -4;
pub const CMDQ_ERROR_EMPTY: i32 = -5;
pub const CMDQ_ERROR_TIMED_OUT: i32 = -6;
pub const CMDQ_ERROR_SIGNAL_FAILURE: i32 = -7;
pub const CMDQ_ERROR_CANCELLED: i32 = -8;
pub const CMDQ_ERROR_INTERNAL: i32 = -9;

pub const CMDQ_STRATEGY_CONDVAR: i32 = 0;
pub const CMDQ_STRATEGY_EVENTFD: i32 = 1;

/// Handle to a queue instance (opaque pointer)
pub struct CmdQueueHandle {
    inner: Arc<BoundedQueue>,
}

fn error_code(err: &QueueError) -> i32 {
    match err {
        QueueError::InvalidArgument(_) => CMDQ_ERROR_INVALID_ARG,
        QueueError::QueueFull => CMDQ_ERROR_QUEUE_FULL,
        QueueError::QueueEmpty => CMDQ_ERROR_EMPTY,
        QueueError::TimedOut => CMDQ_ERROR_TIMED_OUT,
        QueueError::SignalFailure(_) => CMDQ_ERROR_SIGNAL_FAILURE,
        QueueError::Cancelled => CMDQ_ERROR_CANCELLED,
        QueueError::Init(_) => CMDQ_ERROR_ALLOCATION_FAILED,
        QueueError::InUse { .. } => CMDQ_ERROR_INTERNAL,
    }
}

/// Create a new queue.
///
/// # Arguments
/// * `capacity` - Number of record slots.
/// * `max_record_size` - Largest accepted record in bytes.
/// * `strategy` - `CMDQ_STRATEGY_CONDVAR` or `CMDQ_STRATEGY_EVENTFD`.
///
/// # Returns
/// * Pointer to `CmdQueueHandle`, or NULL on failure.
#[no_mangle]
pub extern "C" fn cmdq_init(capacity: u32, max_record_size: u32, strategy: i32) -> *mut CmdQueueHandle {
    let strategy = match strategy {
        CMDQ_STRATEGY_CONDVAR => WaitStrategy::Condvar,
        CMDQ_STRATEGY_EVENTFD => WaitStrategy::EventFd,
        other => {
            tracing::error!(strategy = other, "cmdq_init: unknown wait strategy");
            return ptr::null_mut();
        }
    };

    match QueueBuilder::new()
        .with_capacity(capacity as usize)
        .with_max_record_size(max_record_size as usize)
        .with_wait_strategy(strategy)
        .build()
    {
        Ok(queue) => Box::into_raw(Box::new(CmdQueueHandle { inner: queue })),
        Err(e) => {
            tracing::error!(error = %e, "cmdq_init: failed to build queue");
            ptr::null_mut()
        }
    }
}

/// Push one record.
///
/// # Returns
/// * Number of bytes written on success, negative error code otherwise.
/// * `CMDQ_ERROR_SIGNAL_FAILURE` means the record *was* stored but the
///   consumer may not have been woken.
#[no_mangle]
pub extern "C" fn cmdq_push(handle: *mut CmdQueueHandle, data: *const u8, len: usize) -> i32 {
    if handle.is_null() || data.is_null() {
        return CMDQ_ERROR_NULL_POINTER;
    }
    if len > i32::MAX as usize {
        return CMDQ_ERROR_INVALID_ARG;
    }

    let queue = unsafe { &(*handle).inner };
    let slice = unsafe { std::slice::from_raw_parts(data, len) };

    match queue.push(slice) {
        Ok(written) => written as i32,
        Err(e) => error_code(&e),
    }
}

/// Pop one record into `out_buf`.
///
/// # Returns
/// * Number of bytes read on success.
/// * `CMDQ_ERROR_EMPTY` if nothing is queued (never blocks).
/// * `CMDQ_ERROR_INVALID_ARG` if `out_len` is smaller than the record; the
///   record stays queued.
#[no_mangle]
pub extern "C" fn cmdq_pop(handle: *mut CmdQueueHandle, out_buf: *mut u8, out_len: usize) -> i32 {
    if handle.is_null() || out_buf.is_null() {
        return CMDQ_ERROR_NULL_POINTER;
    }

    let queue = unsafe { &(*handle).inner };
    let out = unsafe { std::slice::from_raw_parts_mut(out_buf, out_len) };

    match queue.pop(out) {
        Ok(read) => read as i32,
        Err(e) => error_code(&e),
    }
}

/// Wait for data.
///
/// # Arguments
/// * `timeout_ms` - Negative waits indefinitely, zero checks without blocking.
///
/// # Returns
/// * 0 once data is present, `CMDQ_ERROR_TIMED_OUT` or `CMDQ_ERROR_CANCELLED` otherwise.
#[no_mangle]
pub extern "C" fn cmdq_poll(handle: *mut CmdQueueHandle, timeout_ms: i32) -> i32 {
    if handle.is_null() {
        return CMDQ_ERROR_NULL_POINTER;
    }

    let queue = unsafe { &(*handle).inner };
    let result = if timeout_ms < 0 {
        queue.wait_indefinite()
    } else {
        queue.wait_timeout(Duration::from_millis(timeout_ms as u64))
    };

    match result {
        Ok(()) => CMDQ_SUCCESS,
        Err(e) => error_code(&e),
    }
}

/// Cancel all current and future waits on the queue.
#[no_mangle]
pub extern "C" fn cmdq_cancel(handle: *mut CmdQueueHandle) -> i32 {
    if handle.is_null() {
        return CMDQ_ERROR_NULL_POINTER;
    }

    let queue = unsafe { &(*handle).inner };
    match queue.cancel() {
        Ok(()) => CMDQ_SUCCESS,
        Err(e) => error_code(&e),
    }
}

/// Destroy a queue. No thread may be using the handle any more.
#[no_mangle]
pub extern "C" fn cmdq_shutdown(handle: *mut CmdQueueHandle) -> i32 {
    if handle.is_null() {
        return CMDQ_ERROR_NULL_POINTER;
    }

    let handle = unsafe { *Box::from_raw(handle) };
    match BoundedQueue::shutdown(handle.inner) {
        Ok(()) => CMDQ_SUCCESS,
        Err(e) => error_code(&e),
    }
}
