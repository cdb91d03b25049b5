// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration, assembled from compiled-in defaults, the optional
//! `/config/game.json` game-identity file, and CLI flags/environment
//! variables, in that increasing order of precedence (§10.3).

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

use crate::cli::Cli;

/// Game identity read from `/config/game.json`, if present (§6 "Virtual
/// filesystem layout").
#[derive(Debug, Clone, Deserialize)]
pub struct GameIdentity {
    pub name: String,
    pub tagline: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub established_year: Option<i32>,
}

impl Default for GameIdentity {
    fn default() -> Self {
        Self { name: "MudForge".to_string(), tagline: String::new(), version: String::new(), established_year: None }
    }
}

/// Fully resolved driver configuration.
pub struct Config {
    pub mudlib_root: PathBuf,
    pub listen_addr: SocketAddr,
    pub log_dir: Option<PathBuf>,
    pub idle_timeout_secs: u64,
    pub handshake_rate_limit: u32,
    pub session_ttl_secs: u64,
    pub bind_session_ip: bool,
    pub session_secret: Vec<u8>,
    pub identity: GameIdentity,
}

impl Config {
    /// Resolve from CLI flags plus the session-secret environment variable.
    /// `/config/game.json` is loaded later, once the VFS exists, via
    /// [`Self::with_identity`].
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        if !cli.mudlib_root.is_dir() {
            return Err(crate::error::DriverError::InvalidRoot(cli.mudlib_root).into());
        }
        let session_secret = match std::env::var("MUDFORGE_SESSION_SECRET") {
            Ok(value) if !value.is_empty() => value.into_bytes(),
            _ => {
                tracing::warn!("MUDFORGE_SESSION_SECRET not set; generating a random secret for this run only");
                mf_session::SessionManager::<mf_core::SystemClock>::random_secret()
            }
        };
        Ok(Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], cli.port)),
            mudlib_root: cli.mudlib_root,
            log_dir: cli.log_dir,
            idle_timeout_secs: cli.idle_timeout_secs,
            handshake_rate_limit: cli.handshake_rate_limit,
            session_ttl_secs: cli.session_ttl_secs,
            bind_session_ip: cli.bind_session_ip,
            session_secret,
            identity: GameIdentity::default(),
        })
    }

    pub fn with_identity(mut self, identity: GameIdentity) -> Self {
        self.identity = identity;
        self
    }
}

/// Load `/config/game.json` through the VFS. A missing file keeps the
/// default identity; a malformed one is a startup error.
pub async fn load_game_identity(vfs: &mf_vfs::Vfs) -> anyhow::Result<GameIdentity> {
    match vfs.read_to_string("/config/game.json").await {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(mf_vfs::VfsError::NotFound(_)) => Ok(GameIdentity::default()),
        Err(error) => Err(error.into()),
    }
}
