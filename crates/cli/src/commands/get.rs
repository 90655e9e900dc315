// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Get command

use super::{parse_get_timeout, parse_seconds, GetTimeout};
use crate::output::{self, Outcome, OutputFormat, StatusLine};
use anyhow::Result;
use semlock_core::NamedLock;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[derive(clap::Args)]
pub struct GetArgs {
    /// Seconds to wait for the lock, -1 for no timeout
    #[arg(
        short = 't',
        long,
        env = "SEMLOCK_GET_TIMEOUT",
        default_value = "0.5",
        allow_negative_numbers = true,
        value_parser = parse_get_timeout
    )]
    get_timeout: GetTimeout,

    /// Release the lock this many seconds after a successful get
    #[arg(short = 'a', long, value_parser = parse_seconds)]
    auto_unget: Option<Duration>,
}

/// Exits with failure when the get timed out
pub async fn handle(
    lock: Arc<NamedLock>,
    args: GetArgs,
    format: OutputFormat,
) -> Result<ExitCode> {
    let GetTimeout(timeout) = args.get_timeout;
    tracing::debug!(lock = %lock.name(), ?timeout, "requesting lock");

    // sem_wait blocks the thread, so keep it off the runtime workers.
    let acquired = {
        let lock = Arc::clone(&lock);
        tokio::task::spawn_blocking(move || lock.acquire(timeout)).await??
    };

    if !acquired {
        output::print(&StatusLine::new(&lock, "get", Outcome::TimedOut), format);
        return Ok(ExitCode::FAILURE);
    }
    output::print(&StatusLine::new(&lock, "get", Outcome::Acquired), format);

    if let Some(delay) = args.auto_unget {
        if format == OutputFormat::Text {
            println!("Release lock after <{}> sec delay", delay.as_secs_f64());
        }
        tokio::time::sleep(delay).await;

        let outcome = if lock.release()? {
            Outcome::Released
        } else {
            Outcome::Ignored
        };
        output::print(&StatusLine::new(&lock, "get", outcome), format);
    }

    Ok(ExitCode::SUCCESS)
}
