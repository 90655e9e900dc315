// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named cross-process lock over a POSIX semaphore
//!
//! Every [`NamedLock`] opened with the same name, in any process, attaches to
//! one kernel semaphore whose count is 1 when unlocked and 0 when locked. The
//! semaphore outlives the handles and the processes that opened it.
//!
//! `is_locked` and `lock_value` are unsynchronized snapshots: another holder
//! may change the count before the caller acts on the answer.

use crate::error::LockError;
use crate::name::LockName;
use crate::observer::{LockEvent, LockObserver, TracingObserver};
use crate::sys::{self, PosixSemaphore, WaitOutcome};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Count of an unlocked semaphore, and its value at creation
pub const UNLOCKED: i32 = 1;
/// Count of a locked semaphore
pub const LOCKED: i32 = 0;

/// Owner-only read/write
pub const DEFAULT_MODE: u32 = 0o600;

/// How `release` decides whether there is anything to release
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Post whenever the shared count reads 0, whichever handle acquired it.
    ///
    /// This lets one process release a lock taken by another. The read and
    /// the post are separate steps, so two racing releases can both post.
    #[default]
    SharedCount,
    /// Post only if this handle acquired the lock and has not released it.
    OwnedOnly,
}

/// Lock configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LockConfig {
    /// Semaphore name, with or without the leading `/`
    pub name: String,
    /// Report every operation at `info` instead of `trace`
    #[serde(default)]
    pub debug: bool,
    /// Permission bits used when the semaphore is created
    #[serde(default = "default_mode")]
    pub mode: u32,
    #[serde(default)]
    pub release_policy: ReleasePolicy,
}

fn default_mode() -> u32 {
    DEFAULT_MODE
}

impl LockConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            debug: false,
            mode: DEFAULT_MODE,
            release_policy: ReleasePolicy::default(),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_release_policy(mut self, policy: ReleasePolicy) -> Self {
        self.release_policy = policy;
        self
    }
}

/// A handle to a system-wide named lock.
///
/// Not re-entrant: acquiring twice through the same handle without a release
/// in between blocks (or times out) like any other contender.
pub struct NamedLock {
    name: LockName,
    sem: PosixSemaphore,
    debug: bool,
    policy: ReleasePolicy,
    /// Whether this handle believes it holds the lock
    held: AtomicBool,
    observer: Box<dyn LockObserver>,
}

impl NamedLock {
    /// Open (or create) the lock `name`.
    ///
    /// With `debug` set, every operation is reported at `info` level.
    pub fn new(name: &str, debug: bool) -> Result<Self, LockError> {
        Self::open(LockConfig::new(name).with_debug(debug))
    }

    /// Open (or create) a lock, reporting through a [`TracingObserver`]
    pub fn open(config: LockConfig) -> Result<Self, LockError> {
        let observer = TracingObserver::new(config.debug);
        Self::open_with_observer(config, observer)
    }

    /// Open (or create) a lock that reports to `observer`.
    ///
    /// The semaphore is created with count 1 if it does not exist and attached
    /// to otherwise. Failures are returned as-is, never retried.
    pub fn open_with_observer(
        config: LockConfig,
        observer: impl LockObserver + 'static,
    ) -> Result<Self, LockError> {
        let name = LockName::new(config.name)?;
        let c_name = name.to_c_string()?;
        let sem = PosixSemaphore::open(&c_name, config.mode, UNLOCKED as u32).map_err(
            |source| LockError::Resource {
                name: name.to_string(),
                source,
            },
        )?;

        let lock = Self {
            name,
            sem,
            debug: config.debug,
            policy: config.release_policy,
            held: AtomicBool::new(false),
            observer: Box::new(observer),
        };
        lock.notify(LockEvent::Opened {
            value: lock.sem.value().ok(),
        });
        Ok(lock)
    }

    /// Acquire the lock, waiting at most `timeout` (forever when `None`).
    ///
    /// Returns `Ok(false)` if the timeout elapsed first; a zero timeout makes
    /// this a non-blocking attempt. `Err` is reserved for OS failures.
    pub fn acquire(&self, timeout: Option<Duration>) -> Result<bool, LockError> {
        let outcome = self
            .sem
            .wait(timeout)
            .map_err(|source| self.os_error("wait", source))?;

        match outcome {
            WaitOutcome::Acquired => {
                self.held.store(true, Ordering::Release);
                self.notify(LockEvent::Acquired {
                    value: self.sem.value().ok(),
                });
                Ok(true)
            }
            WaitOutcome::TimedOut => {
                self.notify(LockEvent::TimedOut {
                    value: self.sem.value().ok(),
                });
                Ok(false)
            }
        }
    }

    /// Acquire only if the lock is free right now
    pub fn try_acquire(&self) -> Result<bool, LockError> {
        self.acquire(Some(Duration::ZERO))
    }

    /// Acquire and wrap the hold in a guard that releases on drop.
    ///
    /// Returns `Ok(None)` on timeout.
    pub fn acquire_guard(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Option<LockGuard<'_>>, LockError> {
        // Lazily built: a guard dropped on the timeout path would release.
        Ok(self.acquire(timeout)?.then(|| LockGuard { lock: self }))
    }

    /// Release the lock.
    ///
    /// Returns `Ok(false)` without touching the semaphore when there is
    /// nothing to release (see [`ReleasePolicy`]), so redundant calls can
    /// never push the count above 1.
    pub fn release(&self) -> Result<bool, LockError> {
        let releasable = match self.policy {
            ReleasePolicy::SharedCount => self.lock_value()? == LOCKED,
            ReleasePolicy::OwnedOnly => {
                // Someone else may have released our hold under SharedCount.
                self.held.load(Ordering::Acquire) && self.lock_value()? == LOCKED
            }
        };

        if !releasable {
            self.held.store(false, Ordering::Release);
            self.notify(LockEvent::ExtraneousRelease {
                value: self.sem.value().ok(),
            });
            return Ok(false);
        }

        self.sem
            .post()
            .map_err(|source| self.os_error("post", source))?;
        self.held.store(false, Ordering::Release);
        self.notify(LockEvent::Released {
            value: self.sem.value().ok(),
        });
        Ok(true)
    }

    /// Whether the shared count currently reads 0
    pub fn is_locked(&self) -> Result<bool, LockError> {
        let value = self.lock_value()?;
        let locked = value == LOCKED;
        self.notify(LockEvent::Queried {
            locked,
            value: Some(value),
        });
        Ok(locked)
    }

    /// Raw semaphore count: 0 when locked, 1 when unlocked
    pub fn lock_value(&self) -> Result<i32, LockError> {
        self.sem
            .value()
            .map_err(|source| self.os_error("getvalue", source))
    }

    pub fn name(&self) -> &LockName {
        &self.name
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn release_policy(&self) -> ReleasePolicy {
        self.policy
    }

    /// Whether this handle acquired the lock and has not released it since.
    ///
    /// Local bookkeeping only; another handle may have released the
    /// semaphore in the meantime.
    pub fn holds(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    fn notify(&self, event: LockEvent) {
        self.observer.observe(&self.name, &event);
    }

    fn os_error(&self, op: &'static str, source: std::io::Error) -> LockError {
        LockError::Os {
            name: self.name.to_string(),
            op,
            source,
        }
    }
}

impl std::fmt::Debug for NamedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedLock")
            .field("name", &self.name)
            .field("debug", &self.debug)
            .field("policy", &self.policy)
            .field("held", &self.holds())
            .finish_non_exhaustive()
    }
}

/// A successful acquire that releases the lock when dropped
#[must_use = "dropping the guard releases the lock immediately"]
#[derive(Debug)]
pub struct LockGuard<'a> {
    lock: &'a NamedLock,
}

impl LockGuard<'_> {
    pub fn lock(&self) -> &NamedLock {
        self.lock
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.release() {
            tracing::warn!(lock = %self.lock.name, error = %e, "release on guard drop failed");
        }
    }
}

/// Remove the semaphore `name` from the system namespace.
///
/// Not part of the locking contract: open handles keep using the old
/// semaphore, and the next open creates a fresh unlocked one. Returns
/// `Ok(false)` when no semaphore had that name.
pub fn unlink(name: &str) -> Result<bool, LockError> {
    let name = LockName::new(name)?;
    let c_name = name.to_c_string()?;
    sys::unlink(&c_name).map_err(|source| LockError::Os {
        name: name.to_string(),
        op: "unlink",
        source,
    })
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
