// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic side channel for lock operations
//!
//! A [`NamedLock`](crate::NamedLock) reports what it did to a [`LockObserver`].
//! Observers only watch; nothing they do feeds back into locking.

use crate::name::LockName;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Something a lock handle did, with the count observed right after.
///
/// `value` is `None` when the count could not be read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LockEvent {
    /// The handle was opened (semaphore created or attached)
    Opened { value: Option<i32> },
    /// An acquire succeeded
    Acquired { value: Option<i32> },
    /// An acquire gave up after its timeout
    TimedOut { value: Option<i32> },
    /// A release posted to the semaphore
    Released { value: Option<i32> },
    /// A release was skipped because the lock was not held
    ExtraneousRelease { value: Option<i32> },
    /// The lock state was queried
    Queried { locked: bool, value: Option<i32> },
}

impl LockEvent {
    /// Count observed alongside the event
    pub fn value(&self) -> Option<i32> {
        match self {
            LockEvent::Opened { value }
            | LockEvent::Acquired { value }
            | LockEvent::TimedOut { value }
            | LockEvent::Released { value }
            | LockEvent::ExtraneousRelease { value }
            | LockEvent::Queried { value, .. } => *value,
        }
    }

    /// Short machine-friendly name, e.g. `"timed_out"`
    pub fn kind(&self) -> &'static str {
        match self {
            LockEvent::Opened { .. } => "opened",
            LockEvent::Acquired { .. } => "acquired",
            LockEvent::TimedOut { .. } => "timed_out",
            LockEvent::Released { .. } => "released",
            LockEvent::ExtraneousRelease { .. } => "extraneous_release",
            LockEvent::Queried { .. } => "queried",
        }
    }
}

impl fmt::Display for LockEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockEvent::Opened { .. } => write!(f, "lock handle opened")?,
            LockEvent::Acquired { .. } => write!(f, "lock request successful")?,
            LockEvent::TimedOut { .. } => write!(f, "lock request timed out")?,
            LockEvent::Released { .. } => write!(f, "lock released")?,
            LockEvent::ExtraneousRelease { .. } => write!(f, "extraneous unget, ignored")?,
            LockEvent::Queried { locked: true, .. } => write!(f, "is currently locked")?,
            LockEvent::Queried { locked: false, .. } => write!(f, "is currently unlocked")?,
        }
        match self.value() {
            Some(value) => write!(f, " ({value})"),
            None => write!(f, " (?)"),
        }
    }
}

/// Receives lock events
pub trait LockObserver: Send + Sync {
    fn observe(&self, lock: &LockName, event: &LockEvent);
}

impl<O: LockObserver + ?Sized> LockObserver for Arc<O> {
    fn observe(&self, lock: &LockName, event: &LockEvent) {
        (**self).observe(lock, event)
    }
}

/// Forwards events to `tracing`.
///
/// Verbose observers log at `info`, quiet ones at `trace` so the events stay
/// available behind `RUST_LOG` without cluttering normal output.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver {
    verbose: bool,
}

impl TracingObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl LockObserver for TracingObserver {
    fn observe(&self, lock: &LockName, event: &LockEvent) {
        let kind = event.kind();
        if self.verbose {
            tracing::info!(lock = %lock, kind, "<{lock}> {event}");
        } else {
            tracing::trace!(lock = %lock, kind, "<{lock}> {event}");
        }
    }
}

/// Discards every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl LockObserver for NoopObserver {
    fn observe(&self, _lock: &LockName, _event: &LockEvent) {}
}

/// Records events in memory, for tests
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<(LockName, LockEvent)>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, oldest first
    pub fn events(&self) -> Vec<LockEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Event kinds recorded so far, oldest first
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(LockEvent::kind).collect()
    }

    /// Names of the locks that reported, oldest first
    pub fn lock_names(&self) -> Vec<LockName> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl LockObserver for RecordingObserver {
    fn observe(&self, lock: &LockName, event: &LockEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((lock.clone(), event.clone()));
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
