// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber setup (§10.1): `tracing_subscriber::fmt` with an `EnvFilter`
//! defaulting to `info`, optionally paired with a `tracing-appender` rolling
//! file writer when a log directory is configured — mirroring the teacher's
//! daemon lifecycle logging setup.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. The returned guard must be kept alive for
/// the process lifetime when file logging is enabled, or buffered lines are
/// lost on exit.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "mudforge.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking).with_ansi(false).init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}
