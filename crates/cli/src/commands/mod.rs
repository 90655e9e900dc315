// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod get;
pub mod state;
pub mod trace;
pub mod unget;

use std::time::Duration;

/// Timeout for `get`: `None` waits forever
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GetTimeout(pub Option<Duration>);

/// Parse a get timeout in seconds; `-1` means no timeout
fn parse_get_timeout(s: &str) -> Result<GetTimeout, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("invalid timeout '{}': expected seconds", s))?;
    if secs == -1.0 {
        return Ok(GetTimeout(None));
    }
    seconds(secs).map(|d| GetTimeout(Some(d)))
}

/// Parse a non-negative number of seconds
fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("invalid duration '{}': expected seconds", s))?;
    seconds(secs)
}

/// Parse a strictly positive number of seconds
fn parse_period(s: &str) -> Result<Duration, String> {
    let period = parse_seconds(s)?;
    if period.is_zero() {
        return Err("period must be greater than zero".to_string());
    }
    Ok(period)
}

fn seconds(secs: f64) -> Result<Duration, String> {
    if secs < 0.0 {
        return Err(format!("{} is negative (use -1 for no timeout)", secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{} is out of range: {}", secs, e))
}
