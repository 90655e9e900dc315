// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Integration tests for contention on one named lock
//!
//! Each worker opens its own handle, the way separate processes would.

use semlock_core::{unlink, LockConfig, NamedLock, RecordingObserver, LOCKED, UNLOCKED};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn unique_name(prefix: &str) -> String {
    format!("semlock-it-{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

// =============================================================================
// Mutual exclusion
// =============================================================================

#[test]
fn every_blocking_acquirer_gets_exactly_one_turn() {
    const WORKERS: u32 = 8;
    let name = unique_name("counter");
    let counter = Arc::new(AtomicU32::new(0));
    let inside = Arc::new(AtomicBool::new(false));
    let start = Arc::new(Barrier::new(WORKERS as usize));

    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let name = name.clone();
            let counter = Arc::clone(&counter);
            let inside = Arc::clone(&inside);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                let lock = NamedLock::new(&name, false).unwrap();
                start.wait();

                assert!(lock.acquire(None).unwrap());
                assert!(
                    !inside.swap(true, Ordering::SeqCst),
                    "two holders inside the critical section"
                );

                // Non-atomic read-modify-write: lost updates show up as a short count.
                let seen = counter.load(Ordering::SeqCst);
                thread::sleep(Duration::from_millis(2));
                counter.store(seen + 1, Ordering::SeqCst);

                inside.store(false, Ordering::SeqCst);
                assert!(lock.release().unwrap());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(counter.load(Ordering::SeqCst), WORKERS);
    let lock = NamedLock::new(&name, false).unwrap();
    assert_eq!(lock.lock_value().unwrap(), UNLOCKED);
    drop(lock);
    unlink(&name).unwrap();
}

#[test]
fn try_acquire_fails_until_holder_releases() {
    let name = unique_name("try");
    let holder = NamedLock::new(&name, false).unwrap();
    assert!(holder.acquire(None).unwrap());

    let attempts: Vec<bool> = (0..4)
        .map(|_| {
            let name = name.clone();
            thread::spawn(move || NamedLock::new(&name, false).unwrap().try_acquire().unwrap())
        })
        .map(|handle| handle.join().unwrap())
        .collect();
    assert!(attempts.iter().all(|acquired| !acquired));

    assert!(holder.release().unwrap());
    let late = NamedLock::new(&name, false).unwrap();
    assert!(late.try_acquire().unwrap());
    assert!(late.release().unwrap());
    unlink(&name).unwrap();
}

// =============================================================================
// Persistence and observation
// =============================================================================

#[test]
fn state_outlives_the_handle_that_set_it() {
    let name = unique_name("persist");
    {
        let lock = NamedLock::new(&name, false).unwrap();
        assert!(lock.acquire(None).unwrap());
    }

    let reopened = NamedLock::new(&name, false).unwrap();
    assert_eq!(reopened.lock_value().unwrap(), LOCKED);
    assert!(!reopened.holds());
    assert!(reopened.release().unwrap());
    drop(reopened);
    unlink(&name).unwrap();
}

#[test]
fn observers_are_per_handle() {
    let name = unique_name("observers");
    let first_events = RecordingObserver::new();
    let second_events = RecordingObserver::new();
    let first =
        NamedLock::open_with_observer(LockConfig::new(&name), first_events.clone()).unwrap();
    let second =
        NamedLock::open_with_observer(LockConfig::new(&name), second_events.clone()).unwrap();

    assert!(first.acquire(None).unwrap());
    assert!(!second.try_acquire().unwrap());
    assert!(first.release().unwrap());

    assert_eq!(first_events.kinds(), vec!["opened", "acquired", "released"]);
    assert_eq!(second_events.kinds(), vec!["opened", "timed_out"]);
    unlink(&name).unwrap();
}
