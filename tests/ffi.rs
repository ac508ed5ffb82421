use dmxp_cmdqueue::ffi::*;
use std::ptr;

#[test]
fn ffi_round_trip() {
    for strategy in [CMDQ_STRATEGY_CONDVAR, CMDQ_STRATEGY_EVENTFD] {
        if cfg!(not(target_os = "linux")) && strategy == CMDQ_STRATEGY_EVENTFD {
            continue;
        }
        let handle = cmdq_init(4, 16, strategy);
        assert!(!handle.is_null());

        assert_eq!(cmdq_poll(handle, 0), CMDQ_ERROR_TIMED_OUT);

        let cmd = [0xDEu8, 0xAD, 0xBE, 0xEF];
        assert_eq!(cmdq_push(handle, cmd.as_ptr(), cmd.len()), 4);
        assert_eq!(cmdq_poll(handle, -1), CMDQ_SUCCESS);

        let mut small = [0u8; 2];
        assert_eq!(cmdq_pop(handle, small.as_mut_ptr(), small.len()), CMDQ_ERROR_INVALID_ARG);

        let mut out = [0u8; 16];
        assert_eq!(cmdq_pop(handle, out.as_mut_ptr(), out.len()), 4);
        assert_eq!(&out[..4], &cmd);
        assert_eq!(cmdq_pop(handle, out.as_mut_ptr(), out.len()), CMDQ_ERROR_EMPTY);

        assert_eq!(cmdq_cancel(handle), CMDQ_SUCCESS);
        assert_eq!(cmdq_poll(handle, -1), CMDQ_ERROR_CANCELLED);
        assert_eq!(cmdq_shutdown(handle), CMDQ_SUCCESS);
    }
}

#[test]
fn ffi_full_and_invalid() {
    let handle = cmdq_init(1, 4, CMDQ_STRATEGY_CONDVAR);
    let cmd = [1u8, 2, 3];
    assert_eq!(cmdq_push(handle, cmd.as_ptr(), 3), 3);
    assert_eq!(cmdq_push(handle, cmd.as_ptr(), 3), CMDQ_ERROR_QUEUE_FULL);
    assert_eq!(cmdq_push(handle, [0u8; 8].as_ptr(), 8), CMDQ_ERROR_INVALID_ARG);
    assert_eq!(cmdq_push(handle, ptr::null(), 3), CMDQ_ERROR_NULL_POINTER);
    assert_eq!(cmdq_poll(ptr::null_mut(), 0), CMDQ_ERROR_NULL_POINTER);
    assert_eq!(cmdq_shutdown(handle), CMDQ_SUCCESS);

    assert!(cmdq_init(0, 4, CMDQ_STRATEGY_CONDVAR).is_null());
    assert!(cmdq_init(4, 4, 99).is_null());
}
