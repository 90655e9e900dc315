// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! semlock - drive a system-wide named lock by hand

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{get, state, trace, unget};
use error::CliError;
use output::OutputFormat;
use semlock_core::{LockConfig, NamedLock};
use std::process::ExitCode;
use std::sync::Arc;

/// Exit status when the lock cannot be opened at all
const EXIT_OPEN_FAILED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "semlock",
    version,
    about = "Inter-process lock over a POSIX named semaphore",
    after_help = "\
Demo/testing commands:
    get:    Get/set the lock. '-a' releases it again after a delay (only if the get succeeded).
    unget:  Release the lock.
    state:  Print the current state of the lock.
    trace:  Continuously print the state of the lock. '-u' sets the update period. Ctrl-C to exit."
)]
struct Cli {
    /// Name of the system-wide lock to access
    lock_name: String,

    /// Do not report each lock operation on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Format of the status lines printed on stdout
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get the lock, optionally releasing it after a delay
    Get(get::GetArgs),
    /// Release the lock
    Unget,
    /// Print the current state of the lock
    State,
    /// Print the state of the lock periodically until Ctrl-C
    Trace(trace::TraceArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging();

    let config = LockConfig::new(&cli.lock_name).with_debug(!cli.quiet);
    let lock = match NamedLock::open(config) {
        Ok(lock) => Arc::new(lock),
        Err(e) => {
            eprint!("{}", CliError::from_lock_error(&cli.lock_name, e));
            return Ok(ExitCode::from(EXIT_OPEN_FAILED));
        }
    };

    match cli.command {
        Commands::Get(args) => get::handle(lock, args, cli.format).await,
        Commands::Unget => unget::handle(&lock, cli.format),
        Commands::State => state::handle(&lock, cli.format),
        Commands::Trace(args) => trace::handle(lock, args, cli.format).await,
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`)
fn setup_logging() {
    use std::io::IsTerminal;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .init();
}
