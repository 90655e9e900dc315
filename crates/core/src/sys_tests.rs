// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::ffi::CString;

fn timespec(tv_sec: libc::time_t, tv_nsec: libc::c_long) -> libc::timespec {
    libc::timespec { tv_sec, tv_nsec }
}

fn scratch_name() -> CString {
    CString::new(format!("/semlock-sys-{}", uuid::Uuid::new_v4().simple())).unwrap()
}

#[test]
fn deadline_adds_whole_seconds() {
    let deadline = add_timeout(timespec(100, 0), Duration::from_secs(5));
    assert_eq!(deadline.tv_sec, 105);
    assert_eq!(deadline.tv_nsec, 0);
}

#[test]
fn deadline_carries_nanoseconds() {
    let deadline = add_timeout(timespec(100, 900_000_000), Duration::from_millis(250));
    assert_eq!(deadline.tv_sec, 101);
    assert_eq!(deadline.tv_nsec, 150_000_000);
}

#[test]
fn deadline_saturates_huge_timeouts() {
    let deadline = add_timeout(timespec(100, 0), Duration::from_secs(u64::MAX));
    assert_eq!(deadline.tv_sec, libc::time_t::MAX);
}

#[test]
fn open_creates_with_initial_value() {
    let name = scratch_name();
    let sem = PosixSemaphore::open(&name, 0o600, 1).unwrap();
    assert_eq!(sem.value().unwrap(), 1);
    drop(sem);
    assert!(unlink(&name).unwrap());
}

#[test]
fn trywait_reports_timeout_when_empty() {
    let name = scratch_name();
    let sem = PosixSemaphore::open(&name, 0o600, 1).unwrap();

    assert_eq!(sem.wait(Some(Duration::ZERO)).unwrap(), WaitOutcome::Acquired);
    assert_eq!(sem.wait(Some(Duration::ZERO)).unwrap(), WaitOutcome::TimedOut);
    assert_eq!(sem.value().unwrap(), 0);

    sem.post().unwrap();
    assert_eq!(sem.value().unwrap(), 1);
    unlink(&name).unwrap();
}

#[test]
fn unlink_missing_name_is_not_an_error() {
    assert!(!unlink(&scratch_name()).unwrap());
}
