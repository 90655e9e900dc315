// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! semlock-core: named cross-process locks over POSIX semaphores
//!
//! This crate provides:
//! - [`NamedLock`] - a system-wide mutual-exclusion lock keyed by name
//! - [`LockName`] - name normalization and validation
//! - [`LockObserver`] - the diagnostic side channel, with tracing and
//!   recording implementations

#[cfg(not(target_os = "linux"))]
compile_error!("semlock-core needs Linux POSIX named semaphores (sem_timedwait, sem_getvalue)");

pub mod error;
pub mod lock;
pub mod name;
pub mod observer;

mod sys;

pub use error::LockError;
pub use lock::{
    unlink, LockConfig, LockGuard, NamedLock, ReleasePolicy, DEFAULT_MODE, LOCKED, UNLOCKED,
};
pub use name::{LockName, MAX_NAME_LEN, NAME_PREFIX};
pub use observer::{LockEvent, LockObserver, NoopObserver, RecordingObserver, TracingObserver};
