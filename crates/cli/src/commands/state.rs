// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State command

use crate::output::{self, OutputFormat, StatusLine};
use anyhow::Result;
use semlock_core::NamedLock;
use std::process::ExitCode;

pub fn handle(lock: &NamedLock, format: OutputFormat) -> Result<ExitCode> {
    let locked = lock.is_locked()?;
    output::print(&StatusLine::state(lock, "state", locked), format);
    Ok(ExitCode::SUCCESS)
}
