// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process entry-point arguments (§6 "CLI / environment", §10.3
//! "Configuration"). The session secret is deliberately not a flag: it is
//! read from `MUDFORGE_SESSION_SECRET` only, matching the teacher's
//! `OJ_AUTH_TOKEN` convention of keeping secrets out of `ps` listings.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "mudforge", version, about = "Text-adventure world driver")]
pub struct Cli {
    /// Root of the mudlib tree (contains /cmds, /std, /daemons, /areas, /data, /config).
    pub mudlib_root: PathBuf,

    /// Port to listen on for player WebSocket connections.
    #[arg(long, default_value_t = 4000)]
    pub port: u16,

    /// Directory to write rolling log files into. Logs to stderr only if unset.
    #[arg(long, env = "MUDFORGE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Idle connection timeout, in seconds.
    #[arg(long, default_value_t = 600)]
    pub idle_timeout_secs: u64,

    /// Per-IP handshake cap, per minute.
    #[arg(long, default_value_t = 60)]
    pub handshake_rate_limit: u32,

    /// Session token time-to-live, in seconds.
    #[arg(long, default_value_t = 3600)]
    pub session_ttl_secs: u64,

    /// Bind issued session tokens to the remote address they were created from.
    #[arg(long, default_value_t = true)]
    pub bind_session_ip: bool,
}
