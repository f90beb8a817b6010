// src/platform/clearlock.rs

//! Implements [`ClearLock`], the process-wide mutual exclusion guarding
//! destructive clear operations.
//!
//! The lock is a POSIX named semaphore: created on first use with one
//! permit, shared by every invocation of this utility, and never unlinked.
//! Its lifetime spans the host, not any single process. Construction
//! failure is the distinct "unavailable" state checked once before any
//! destructive work; acquisition itself blocks without timeout.

use crate::common::SelError;

use std::ffi::CString;

use ::nix::errno::Errno;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defx, defñ};

/// Name of the semaphore shared by all invocations.
pub const CLEAR_LOCK_NAME: &str = "/log-util-clear";

/// A held clear lock. The permit is released on drop; the named semaphore
/// itself persists for the next invocation.
#[derive(Debug)]
pub struct ClearLock {
    sem: *mut libc::sem_t,
}

impl ClearLock {
    /// Open (creating if absent) the shared semaphore and block until the
    /// permit is acquired. Any failure to open or wait is
    /// [`SelError::LockUnavailable`].
    pub fn acquire() -> Result<ClearLock, SelError> {
        ClearLock::acquire_named(CLEAR_LOCK_NAME)
    }

    /// As [`acquire`] with a caller-supplied semaphore name.
    ///
    /// [`acquire`]: ClearLock::acquire
    pub fn acquire_named(name: &str) -> Result<ClearLock, SelError> {
        defn!("({:?})", name);
        let name_c: CString = match CString::new(name) {
            Ok(val) => val,
            Err(_) => return Err(SelError::LockUnavailable),
        };
        // SAFETY: `name_c` outlives the call; mode and initial value are
        // the variadic arguments sem_open(3) reads with O_CREAT.
        let sem: *mut libc::sem_t = unsafe {
            libc::sem_open(
                name_c.as_ptr(),
                libc::O_CREAT,
                0o644 as libc::c_uint,
                1 as libc::c_uint,
            )
        };
        if sem == libc::SEM_FAILED {
            defx!("sem_open failed: {}", Errno::last());
            return Err(SelError::LockUnavailable);
        }
        loop {
            // SAFETY: `sem` was returned by a successful sem_open
            let ret: libc::c_int = unsafe { libc::sem_wait(sem) };
            if ret == 0 {
                break;
            }
            if Errno::last() == Errno::EINTR {
                continue;
            }
            defx!("sem_wait failed: {}", Errno::last());
            // SAFETY: closing the handle this process opened
            unsafe {
                libc::sem_close(sem);
            }
            return Err(SelError::LockUnavailable);
        }
        defx!("acquired");

        Ok(ClearLock { sem })
    }
}

impl Drop for ClearLock {
    fn drop(&mut self) {
        // return the permit and close this process's handle; never
        // sem_unlink, the semaphore outlives every invocation
        // SAFETY: `self.sem` is the handle acquired in `acquire_named`
        unsafe {
            libc::sem_post(self.sem);
            libc::sem_close(self.sem);
        }
        defñ!("released");
    }
}
