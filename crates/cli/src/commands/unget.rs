// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unget command

use crate::output::{self, Outcome, OutputFormat, StatusLine};
use anyhow::Result;
use semlock_core::NamedLock;
use std::process::ExitCode;

/// An unget with nothing to release is reported but still succeeds
pub fn handle(lock: &NamedLock, format: OutputFormat) -> Result<ExitCode> {
    let outcome = if lock.release()? {
        Outcome::Released
    } else {
        Outcome::Ignored
    };
    output::print(&StatusLine::new(lock, "unget", outcome), format);
    Ok(ExitCode::SUCCESS)
}
