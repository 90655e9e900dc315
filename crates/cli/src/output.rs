// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use semlock_core::NamedLock;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(value) {
                println!("{}", json);
            }
        }
    }
}

/// What a command observed or did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Acquired,
    TimedOut,
    Released,
    Ignored,
    Locked,
    Unlocked,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Acquired => "lock acquired",
            Outcome::TimedOut => "lock request timed out",
            Outcome::Released => "lock released",
            Outcome::Ignored => "extraneous unget, ignored",
            Outcome::Locked => "is locked",
            Outcome::Unlocked => "is unlocked",
        };
        f.write_str(text)
    }
}

/// One status line per lock operation
#[derive(Debug, Clone, Serialize)]
pub struct StatusLine {
    pub lock: String,
    pub command: &'static str,
    pub outcome: Outcome,
    /// Semaphore count read right after the operation
    pub value: Option<i32>,
}

impl StatusLine {
    pub fn new(lock: &NamedLock, command: &'static str, outcome: Outcome) -> Self {
        Self {
            lock: lock.name().to_string(),
            command,
            outcome,
            value: lock.lock_value().ok(),
        }
    }

    pub fn state(lock: &NamedLock, command: &'static str, locked: bool) -> Self {
        let outcome = if locked {
            Outcome::Locked
        } else {
            Outcome::Unlocked
        };
        Self::new(lock, command, outcome)
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}", self.lock, self.outcome)?;
        match self.value {
            Some(value) => write!(f, " ({})", value),
            None => write!(f, " (?)"),
        }
    }
}
