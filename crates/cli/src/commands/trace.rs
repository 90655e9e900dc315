// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trace command: sample the lock state until interrupted

use super::parse_period;
use crate::output::{self, OutputFormat, StatusLine};
use anyhow::Result;
use semlock_core::NamedLock;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{interval, MissedTickBehavior};

#[derive(clap::Args)]
pub struct TraceArgs {
    /// Seconds between samples
    #[arg(
        short,
        long,
        env = "SEMLOCK_TRACE_PERIOD",
        default_value = "0.5",
        value_parser = parse_period
    )]
    update: Duration,

    /// Stop after this many samples instead of waiting for Ctrl-C
    #[arg(short = 'n', long)]
    count: Option<u64>,
}

pub async fn handle(
    lock: Arc<NamedLock>,
    args: TraceArgs,
    format: OutputFormat,
) -> Result<ExitCode> {
    let stop = Arc::new(Notify::new());
    let s = stop.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nStopping trace...");
        s.notify_one();
    })?;

    let mut timer = interval(args.update);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut samples: u64 = 0;

    while args.count.map_or(true, |count| samples < count) {
        tokio::select! {
            _ = stop.notified() => break,
            _ = timer.tick() => {}
        }

        let locked = lock.is_locked()?;
        output::print(&StatusLine::state(&lock, "trace", locked), format);
        samples += 1;
    }

    tracing::debug!(samples, "trace finished");
    Ok(ExitCode::SUCCESS)
}
