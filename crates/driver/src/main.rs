// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process entry point (§6, §10.1-10.5): parse arguments, install logging,
//! bootstrap the world, and run the single-threaded event loop until a
//! shutdown signal arrives.

mod cli;
mod config;
mod error;
mod logging;
mod status;
mod world;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mf_core::SystemClock;
use mf_net::{ConnectionRegistry, HandshakeLimiter, NetServer};
use mf_script::DeletionWatcher;
use mf_vfs::Vfs;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::DriverError;
use crate::world::World;

const TICK_INTERVAL: Duration = Duration::from_millis(200);
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(30);
const DELETION_POLL_INTERVAL: Duration = Duration::from_millis(500);
const DELETION_DEBOUNCE: Duration = Duration::from_millis(300);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_dir.as_deref());

    if let Err(error) = run(cli).await {
        error!(%error, "mudforge exited with an error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(cli)?;
    let vfs = Vfs::new(config.mudlib_root.clone());
    let identity = config::load_game_identity(&vfs).await?;
    let config = config.with_identity(identity);
    info!(name = %config.identity.name, root = %config.mudlib_root.display(), "booting world");

    let net_registry = Arc::new(ConnectionRegistry::new());
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let mut world = World::bootstrap(vfs, Arc::clone(&net_registry), &config).await?;

    let rate_limiter = Arc::new(HandshakeLimiter::new(SystemClock, config.handshake_rate_limit));
    let server = NetServer::<SystemClock>::bind(
        config.listen_addr,
        net_registry,
        events_tx,
        rate_limiter,
        Duration::from_secs(config.idle_timeout_secs),
    )
    .await
    .map_err(|source| DriverError::Bind { addr: config.listen_addr, source })?;
    tokio::spawn(server.run());
    info!(addr = %config.listen_addr, "listening for players");

    let mut deletion_watcher = DeletionWatcher::new(&config.mudlib_root, DELETION_DEBOUNCE).ok();
    if deletion_watcher.is_none() {
        info!("file watcher unavailable; hot deletions will require a restart to take effect");
    }

    let mut tick_timer = interval(TICK_INTERVAL);
    let mut sweep_timer = interval(SESSION_SWEEP_INTERVAL);
    let mut deletion_timer = interval(DELETION_POLL_INTERVAL);

    loop {
        tokio::select! {
            event = events_rx.recv() => {
                match event {
                    Some(event) => world.handle_event(event),
                    None => {
                        info!("all connection channels closed; shutting down");
                        break;
                    }
                }
            }
            _ = tick_timer.tick() => world.tick(),
            _ = sweep_timer.tick() => world.sweep_sessions(),
            _ = deletion_timer.tick() => {
                if let Some(watcher) = deletion_watcher.as_mut() {
                    for path in watcher.poll_deletions() {
                        world.handle_deleted_path(&config.mudlib_root, &path);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    world.save_all_players().await;
    info!("shutdown complete");
    Ok(())
}
