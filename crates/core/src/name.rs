// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semaphore name normalization
//!
//! POSIX named semaphores live in a flat namespace where every name starts
//! with a `/`. Callers may pass the name with or without it; leading slashes
//! are collapsed, so `jobs`, `/jobs` and `//jobs` resolve to one kernel object.

use crate::error::LockError;
use std::ffi::CString;
use std::fmt;
use std::str::FromStr;

/// Leading marker required by `sem_open`
pub const NAME_PREFIX: char = '/';

/// Longest accepted name in bytes, not counting the leading `/`.
///
/// glibc drops the `/` and stores semaphores as `/dev/shm/sem.<body>`, so the
/// body may use `NAME_MAX` (255) minus the four bytes of `sem.`.
pub const MAX_NAME_LEN: usize = 251;

/// A normalized, validated semaphore name
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LockName(String);

impl LockName {
    /// Normalize `raw` to carry exactly one leading `/` and validate it.
    ///
    /// Normalization is idempotent: `"jobs"`, `"/jobs"` and `"//jobs"` produce
    /// the same name.
    pub fn new(raw: impl Into<String>) -> Result<Self, LockError> {
        let raw = raw.into();
        let invalid = |reason| LockError::InvalidName {
            name: raw.clone(),
            reason,
        };

        let body = raw.trim_start_matches(NAME_PREFIX);
        if body.is_empty() {
            return Err(invalid("name is empty"));
        }
        if body.contains(NAME_PREFIX) {
            return Err(invalid("'/' is only allowed at the start"));
        }
        if body.contains('\0') {
            return Err(invalid("name contains a NUL byte"));
        }
        if body.len() > MAX_NAME_LEN {
            return Err(invalid("name is too long"));
        }

        Ok(Self(format!("{NAME_PREFIX}{body}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its leading `/`
    pub fn bare(&self) -> &str {
        &self.0[NAME_PREFIX.len_utf8()..]
    }

    pub(crate) fn to_c_string(&self) -> Result<CString, LockError> {
        CString::new(self.0.as_bytes()).map_err(|_| LockError::InvalidName {
            name: self.0.clone(),
            reason: "name contains a NUL byte",
        })
    }
}

impl fmt::Display for LockName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LockName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for LockName {
    type Err = LockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LockName {
    type Error = LockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
