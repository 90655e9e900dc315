// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for named lock operations

use std::io;
use thiserror::Error;

/// Errors raised by [`NamedLock`](crate::NamedLock).
///
/// Opening a lock fails with either `InvalidName` (rejected before any OS
/// call) or `Resource` (`sem_open` failed); both mean the lock could not be
/// opened. `Os` only comes from operations on an open lock.
///
/// Acquire timeouts and redundant releases are not errors; they come back as
/// `Ok(false)` from `acquire` and `release`.
#[derive(Debug, Error)]
pub enum LockError {
    /// The name was rejected before reaching the OS
    #[error("invalid lock name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The named semaphore could not be created or opened
    #[error("cannot open semaphore {name}: {source}")]
    Resource {
        name: String,
        #[source]
        source: io::Error,
    },

    /// An operation on an already-open semaphore failed unexpectedly
    #[error("sem_{op} failed on {name}: {source}")]
    Os {
        name: String,
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

impl LockError {
    /// The underlying OS error kind, when there is one
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            LockError::InvalidName { .. } => None,
            LockError::Resource { source, .. } | LockError::Os { source, .. } => {
                Some(source.kind())
            }
        }
    }

    /// The raw errno, when there is one
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            LockError::InvalidName { .. } => None,
            LockError::Resource { source, .. } | LockError::Os { source, .. } => {
                source.raw_os_error()
            }
        }
    }

    /// Whether the OS ran out of memory, descriptors, or space in `/dev/shm`
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(
            self.raw_os_error(),
            Some(libc::EMFILE | libc::ENFILE | libc::ENOSPC | libc::ENOMEM)
        )
    }
}
