// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX named semaphore bindings
//!
//! The only module allowed to call into libc. Everything above it deals in
//! `io::Result` and never sees a raw pointer.

#![allow(unsafe_code)]

use std::ffi::CStr;
use std::io;
use std::ptr::NonNull;
use std::time::Duration;

const NANOS_PER_SEC: libc::c_long = 1_000_000_000;

/// Result of a wait on the semaphore
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WaitOutcome {
    Acquired,
    TimedOut,
}

/// An open handle to a named semaphore, closed on drop
#[derive(Debug)]
pub(crate) struct PosixSemaphore {
    raw: NonNull<libc::sem_t>,
}

// SAFETY: the sem_* family is thread-safe, and the pointer stays valid until
// `sem_close` runs in `Drop`, which needs exclusive ownership.
unsafe impl Send for PosixSemaphore {}
unsafe impl Sync for PosixSemaphore {}

impl PosixSemaphore {
    /// Open `name`, creating it with `initial` if it does not exist yet
    pub(crate) fn open(name: &CStr, mode: u32, initial: u32) -> io::Result<Self> {
        // SAFETY: `name` is NUL-terminated; with O_CREAT, sem_open reads a
        // mode_t and an unsigned int from its variadic arguments.
        let raw = unsafe {
            libc::sem_open(
                name.as_ptr(),
                libc::O_CREAT,
                mode as libc::c_uint,
                initial as libc::c_uint,
            )
        };
        if raw == libc::SEM_FAILED {
            return Err(io::Error::last_os_error());
        }
        NonNull::new(raw)
            .map(|raw| Self { raw })
            .ok_or_else(io::Error::last_os_error)
    }

    /// Decrement the count, waiting at most `timeout` (forever when `None`).
    ///
    /// A zero timeout never blocks.
    pub(crate) fn wait(&self, timeout: Option<Duration>) -> io::Result<WaitOutcome> {
        let sem = self.raw.as_ptr();
        match timeout {
            // SAFETY: `sem` is a live handle for the lifetime of `self`.
            None => retry_interrupted(|| unsafe { libc::sem_wait(sem) }),
            Some(timeout) if timeout.is_zero() => {
                // SAFETY: as above.
                retry_interrupted(|| unsafe { libc::sem_trywait(sem) })
            }
            Some(timeout) => {
                // Computed once so interrupted waits resume against the same deadline.
                let deadline = realtime_deadline(timeout)?;
                // SAFETY: as above; `deadline` outlives the call.
                retry_interrupted(|| unsafe { libc::sem_timedwait(sem, &deadline) })
            }
        }
    }

    /// Increment the count by one
    pub(crate) fn post(&self) -> io::Result<()> {
        // SAFETY: `self.raw` is a live handle.
        if unsafe { libc::sem_post(self.raw.as_ptr()) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    /// Snapshot of the current count
    pub(crate) fn value(&self) -> io::Result<i32> {
        let mut value: libc::c_int = 0;
        // SAFETY: `self.raw` is a live handle and `value` is a valid out pointer.
        if unsafe { libc::sem_getvalue(self.raw.as_ptr(), &mut value) } == 0 {
            Ok(value)
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

impl Drop for PosixSemaphore {
    fn drop(&mut self) {
        // SAFETY: the handle came from sem_open and is closed exactly once.
        if unsafe { libc::sem_close(self.raw.as_ptr()) } != 0 {
            tracing::warn!(error = %io::Error::last_os_error(), "sem_close failed");
        }
    }
}

/// Remove `name` from the semaphore namespace.
///
/// Returns `Ok(false)` when no such semaphore exists. Open handles keep
/// working until they are closed.
pub(crate) fn unlink(name: &CStr) -> io::Result<bool> {
    // SAFETY: `name` is NUL-terminated.
    if unsafe { libc::sem_unlink(name.as_ptr()) } == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ENOENT) => Ok(false),
        _ => Err(err),
    }
}

fn retry_interrupted(mut call: impl FnMut() -> libc::c_int) -> io::Result<WaitOutcome> {
    loop {
        if call() == 0 {
            return Ok(WaitOutcome::Acquired);
        }
        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EINTR) => continue,
            Some(libc::EAGAIN) | Some(libc::ETIMEDOUT) => return Ok(WaitOutcome::TimedOut),
            _ => return Err(err),
        }
    }
}

/// Absolute `CLOCK_REALTIME` deadline `timeout` from now, as sem_timedwait expects
fn realtime_deadline(timeout: Duration) -> io::Result<libc::timespec> {
    let mut now = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `now` is a valid out pointer.
    if unsafe { libc::clock_gettime(libc::CLOCK_REALTIME, &mut now) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(add_timeout(now, timeout))
}

fn add_timeout(start: libc::timespec, timeout: Duration) -> libc::timespec {
    let secs = libc::time_t::try_from(timeout.as_secs()).unwrap_or(libc::time_t::MAX);
    let mut tv_sec = start.tv_sec.saturating_add(secs);
    let mut tv_nsec = start.tv_nsec + timeout.subsec_nanos() as libc::c_long;
    if tv_nsec >= NANOS_PER_SEC {
        tv_sec = tv_sec.saturating_add(1);
        tv_nsec -= NANOS_PER_SEC;
    }
    libc::timespec { tv_sec, tv_nsec }
}

#[cfg(test)]
#[path = "sys_tests.rs"]
mod tests;
