// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a unique test identifier using pid + timestamp + atomic counter.
/// This ensures uniqueness even with parallel test execution.
pub fn unique_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos();
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}-{}", std::process::id(), timestamp % 1_000_000, counter)
}

/// A lock name private to one test, unlinked when dropped
pub struct TestLock {
    pub name: String,
}

impl TestLock {
    pub fn new(prefix: &str) -> Self {
        Self {
            name: format!("semlock-cli-{}-{}", prefix, unique_id()),
        }
    }

    /// `semlock <name> <args...>` with debug output silenced
    pub fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("semlock").expect("semlock binary");
        cmd.arg(&self.name).args(args).arg("--quiet");
        cmd
    }

    /// `semlock <name> <args...>` as a plain std process, for background use
    pub fn spawn(&self, args: &[&str]) -> std::process::Child {
        std::process::Command::new(assert_cmd::cargo::cargo_bin("semlock"))
            .arg(&self.name)
            .args(args)
            .arg("--quiet")
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .expect("Failed to spawn semlock")
    }
}

impl Drop for TestLock {
    fn drop(&mut self) {
        let _ = semlock_core::unlink(&self.name);
    }
}
