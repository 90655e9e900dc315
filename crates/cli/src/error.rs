// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! This module provides enhanced error types that include:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use semlock_core::{LockError, MAX_NAME_LEN, NAME_PREFIX};
use std::fmt;
use std::io;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Explain why the lock `requested` could not be opened.
    pub fn from_lock_error(requested: &str, err: LockError) -> Self {
        let bare = requested.trim_start_matches(NAME_PREFIX);
        let shm_path = format!("/dev/shm/sem.{}", bare);

        let error = match &err {
            LockError::InvalidName { reason, .. } => {
                CliError::new(format!("Invalid lock name '{}'", requested))
                    .with_context(reason.to_string())
                    .with_suggestion("Use a plain name such as 'build-lock' (a leading '/' is optional)")
                    .with_suggestion(format!("Keep names to {} bytes or fewer", MAX_NAME_LEN))
            }
            LockError::Resource { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    CliError::new(format!("Permission denied opening lock '{}'", requested))
                        .with_context("The semaphore exists and belongs to another user")
                        .with_context("Locks are created owner-only (mode 0600)")
                        .with_suggestion(format!("Check the owner: ls -l {}", shm_path))
                        .with_suggestion("Run as the owning user, or pick another lock name")
                }
                _ if err.is_resource_exhausted() => {
                    CliError::new(format!("Out of resources opening lock '{}'", requested))
                        .with_context(source.to_string())
                        .with_suggestion("Check free space: df -h /dev/shm")
                        .with_suggestion("Check the open file limit: ulimit -n")
                }
                _ => CliError::new(format!("Cannot open lock '{}'", requested))
                    .with_context(source.to_string())
                    .with_suggestion("Check that /dev/shm is mounted and writable"),
            },
            LockError::Os { op, source, .. } => {
                CliError::new(format!("Lock operation sem_{} failed", op))
                    .with_context(source.to_string())
            }
        };
        error.with_source(err)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
