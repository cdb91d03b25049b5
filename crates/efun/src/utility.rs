// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stateless utility efuns (§4.7 "Utility").

use chrono::{DateTime, Utc};
use rand::Rng;

/// Capitalize the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// A uniformly random integer in `[low, high)`. Returns `low` if the range
/// is empty or inverted.
pub fn random(low: i64, high: i64) -> i64 {
    if high <= low {
        return low;
    }
    rand::thread_rng().gen_range(low..high)
}

/// Minimal `printf`-style formatter supporting `%s` (display) and `%d`
/// (integer) placeholders, in the teacher's restrained style: enough for
/// command output, not a general format-string engine.
pub fn sprintf(format: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut args = args.iter();
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') | Some('d') => {
                if let Some(arg) = args.next() {
                    out.push_str(arg);
                } else {
                    out.push_str("%!MISSING");
                }
            }
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

pub fn to_seconds(ms: u64) -> u64 {
    ms / 1000
}

pub fn to_milliseconds(seconds: u64) -> u64 {
    seconds * 1000
}

/// Render a millisecond duration as `1h 2m 3s`-style text, omitting leading
/// zero components.
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || hours > 0 {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}s"));
    parts.join(" ")
}

/// Render an epoch-millisecond timestamp as an RFC 3339 UTC string.
pub fn format_date(epoch_ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "utility_tests.rs"]
mod tests;
