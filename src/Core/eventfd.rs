use std::io;
use std::time::Duration;

/// Thin owner of a Linux `eventfd` counter.
///
/// The descriptor is non-blocking: `drain` on an already-drained counter
/// returns `Ok(0)` instead of parking the caller.
#[cfg(target_os = "linux")]
#[derive(Debug)]
pub struct EventFd {
    fd: libc::c_int,
}

#[cfg(target_os = "linux")]
impl EventFd {
    pub fn new() -> io::Result<Self> {
        let fd = unsafe { libc::eventfd(0, libc::EFD_CLOEXEC | libc::EFD_NONBLOCK) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd })
    }

    /// Adds 1 to the counter, making the descriptor readable.
    pub fn signal(&self) -> io::Result<()> {
        let value: u64 = 1;
        let written = unsafe {
            libc::write(
                self.fd,
                &value as *const u64 as *const libc::c_void,
                std::mem::size_of::<u64>(),
            )
        };
        if written != std::mem::size_of::<u64>() as isize {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// Reads and clears the counter. Returns the number of pending signals.
    pub fn drain(&self) -> io::Result<u64> {
        let mut value: u64 = 0;
        let read = unsafe {
            libc::read(
                self.fd,
                &mut value as *mut u64 as *mut libc::c_void,
                std::mem::size_of::<u64>(),
            )
        };
        if read < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EAGAIN) {
                return Ok(0);
            }
            return Err(err);
        }
        Ok(value)
    }

    /// Blocks until the counter is non-zero or `timeout` elapses.
    pub fn wait_readable(&self, timeout: Option<Duration>) -> io::Result<bool> {
        wait_any(&[self], timeout)
    }
}

/// Blocks until any of `fds` is readable or `timeout` elapses.
///
/// `None` waits forever. Returns `Ok(true)` when at least one descriptor is
/// readable, `Ok(false)` on timeout. `EINTR` surfaces as an `Interrupted`
/// error so the caller can recompute its remaining time.
#[cfg(target_os = "linux")]
pub fn wait_any(fds: &[&EventFd], timeout: Option<Duration>) -> io::Result<bool> {
    let mut pfds: Vec<libc::pollfd> = fds
        .iter()
        .map(|efd| libc::pollfd {
            fd: efd.fd,
            events: libc::POLLIN,
            revents: 0,
        })
        .collect();
    let timeout_ms = match timeout {
        None => -1,
        // Round up so a wait never ends before the caller's deadline.
        Some(t) => t.as_nanos().div_ceil(1_000_000).min(libc::c_int::MAX as u128) as libc::c_int,
    };
    let ret = unsafe { libc::poll(pfds.as_mut_ptr(), pfds.len() as libc::nfds_t, timeout_ms) };
    match ret {
        r if r < 0 => Err(io::Error::last_os_error()),
        0 => Ok(false),
        _ => Ok(pfds.iter().any(|p| p.revents & libc::POLLIN != 0)),
    }
}

#[cfg(target_os = "linux")]
impl Drop for EventFd {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn signal_then_drain_counts() {
        let efd = EventFd::new().unwrap();
        efd.signal().unwrap();
        efd.signal().unwrap();
        efd.signal().unwrap();
        assert!(efd.wait_readable(Some(Duration::ZERO)).unwrap());
        assert_eq!(efd.drain().unwrap(), 3);
        assert_eq!(efd.drain().unwrap(), 0);
    }

    #[test]
    fn unsignalled_wait_times_out() {
        let efd = EventFd::new().unwrap();
        let start = Instant::now();
        assert!(!efd.wait_readable(Some(Duration::from_millis(20))).unwrap());
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn wait_any_sees_second_descriptor() {
        let quiet = EventFd::new().unwrap();
        let loud = EventFd::new().unwrap();
        loud.signal().unwrap();
        assert!(wait_any(&[&quiet, &loud], Some(Duration::from_millis(50))).unwrap());
        // Undrained counters stay readable.
        assert!(wait_any(&[&quiet, &loud], Some(Duration::ZERO)).unwrap());
        assert_eq!(quiet.drain().unwrap(), 0);
    }
}
