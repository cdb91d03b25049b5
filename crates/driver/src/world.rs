// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single world-owning task (§5 "Rust realization of the single-thread
//! invariant"): one [`World`] holds the efun bridge and reacts to inbound
//! network events and scheduler ticks, never running two handlers
//! concurrently. Transport tasks (`mf-net`) never touch this state directly;
//! they only ever send [`InboundEvent`]s down the channel this struct reads.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use mf_core::{EmptyClass, ObjectId, ObjectRegistry, Permissions, ScriptContext, SystemClock};
use mf_dispatch::{Dispatcher, load_command_table};
use mf_efun::EfunBridge;
use mf_net::{ConnectionRegistry, InboundEvent, NetSink};
use mf_scheduler::Scheduler;
use mf_session::SessionManager;
use mf_vfs::Vfs;
use tracing::{debug, info, warn};

use crate::status::StatusSnapshot;

const PLAYER_BLUEPRINT: &str = "/std/player";
const VOID_ROOM: &str = "/std/void";

/// The scan roots bootstrapped as object blueprints at startup. `/cmds` has
/// its own loader ([`load_command_table`]); `/config` and `/data` are never
/// blueprints.
const BLUEPRINT_ROOTS: [&str; 3] = ["/std", "/daemons", "/areas"];

pub struct World {
    bridge: EfunBridge<SystemClock>,
    start: Instant,
    remote_addrs: std::collections::HashMap<mf_core::ConnectionId, String>,
}

impl World {
    pub async fn bootstrap(vfs: Vfs, net: Arc<ConnectionRegistry>, config: &crate::config::Config) -> anyhow::Result<Self> {
        let mut registry = ObjectRegistry::new();
        registry.register_blueprint(VOID_ROOM, Arc::new(EmptyClass));

        let permissions = Permissions::new();
        let scheduler = Scheduler::new(SystemClock);
        let sessions = SessionManager::new(
            config.session_secret.clone(),
            config.session_ttl_secs * 1_000,
            config.bind_session_ip,
            SystemClock,
        );

        let mut bridge = EfunBridge::new(SystemClock, registry, permissions, scheduler, sessions, vfs);
        bridge.set_sink(Box::new(NetSink::new(net)));
        bridge.set_void_room(ObjectId::blueprint(VOID_ROOM));

        for root in BLUEPRINT_ROOTS {
            bootstrap_dir(&mut bridge, root).await;
        }
        if bridge.load_object(PLAYER_BLUEPRINT).is_none() {
            warn!(blueprint = PLAYER_BLUEPRINT, "no player blueprint found under /std; login will fail");
        }

        let commands = load_command_table(bridge.vfs()).await?;
        let dispatcher = Dispatcher::<SystemClock>::new(commands);
        bridge.set_command_executor(Box::new(dispatcher));

        Ok(Self { bridge, start: Instant::now(), remote_addrs: std::collections::HashMap::new() })
    }

    /// Process one world event. Called exclusively from the single
    /// world-owning task; never invoked concurrently with itself.
    pub fn handle_event(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Connected { connection, remote_addr } => {
                debug!(%connection, remote_addr, "connection accepted, awaiting login");
                self.remote_addrs.insert(connection, remote_addr);
            }
            InboundEvent::Line { connection, line } => self.handle_line(connection, line),
            InboundEvent::GuiResponse { connection, .. } => {
                debug!(%connection, "gui response received with no modal session open");
            }
            InboundEvent::Disconnected { connection } => {
                self.remote_addrs.remove(&connection);
                debug!(%connection, "connection dropped; session retained for reconnect");
            }
        }
    }

    fn handle_line(&mut self, connection: mf_core::ConnectionId, line: String) {
        if let Some(player_name) = self.bridge.find_connected_player(connection) {
            if let Some(player) = self.bridge.find_active_player(&player_name) {
                let _ = self.bridge.execute_command(&player, &line);
            }
            return;
        }

        let remote_addr = self.remote_addrs.get(&connection).cloned().unwrap_or_default();
        let trimmed = line.trim();
        if let Some(name) = trimmed.strip_prefix("connect ") {
            self.login(connection, name.trim(), &remote_addr);
        } else if let Some(token) = trimmed.strip_prefix("reconnect ") {
            self.reconnect(connection, token.trim(), &remote_addr);
        } else {
            ScriptContext::send(
                &mut self.bridge,
                &ObjectId::blueprint(VOID_ROOM),
                "Please `connect <name>` or `reconnect <token>` first.",
            );
        }
    }

    fn login(&mut self, connection: mf_core::ConnectionId, name: &str, remote_addr: &str) {
        if name.is_empty() {
            return;
        }
        let player = match self.bridge.find_active_player(name) {
            Some(existing) => existing,
            None => match self.bridge.clone_object(PLAYER_BLUEPRINT) {
                Ok(id) => {
                    let void = ObjectId::blueprint(VOID_ROOM);
                    if let Err(error) = self.bridge.move_object(&id, Some(&void)) {
                        warn!(%error, "failed to place new player in the void room");
                    }
                    id
                }
                Err(error) => {
                    warn!(%error, "failed to clone player blueprint");
                    return;
                }
            },
        };
        self.bridge.register_active_player(name, player.clone());
        self.bridge.bind_player_to_connection(name, connection);
        let token = self.bridge.issue_session(name, connection, remote_addr);
        info!(name, %connection, "player connected");
        ScriptContext::send(&mut self.bridge, &player, &format!("Welcome, {name}. Your reconnect token is {token}."));
    }

    fn reconnect(&mut self, connection: mf_core::ConnectionId, token: &str, remote_addr: &str) {
        let outcome = self.bridge.validate_session(token, Some(remote_addr));
        let name = match outcome {
            Ok(name) => name,
            Err(error) => {
                ScriptContext::send(&mut self.bridge, &ObjectId::blueprint(VOID_ROOM), "That reconnect token is no longer valid.");
                debug!(%connection, %error, "reconnect rejected");
                return;
            }
        };
        let Some(player) = self.bridge.find_active_player(&name) else {
            ScriptContext::send(&mut self.bridge, &ObjectId::blueprint(VOID_ROOM), "No active session for that token.");
            return;
        };
        self.bridge.transfer_connection(&name, connection);
        self.bridge.invalidate_player_sessions(&name);
        let fresh_token = self.bridge.issue_session(&name, connection, remote_addr);
        info!(name, %connection, "player reconnected");
        ScriptContext::send(
            &mut self.bridge,
            &player,
            &format!("Reconnected. Your new reconnect token is {fresh_token}."),
        );
    }

    /// Drive one scheduler tick: due heartbeats, then due callouts (§5
    /// "Ordering guarantees").
    pub fn tick(&mut self) {
        self.bridge.run_due_heartbeats();
        self.bridge.run_due_callouts();
    }

    pub fn sweep_sessions(&mut self) {
        self.bridge.sweep_sessions();
    }

    /// React to one deleted source path under the mudlib root (§4.5, §8
    /// "Room deletion evacuation"). `path` is the absolute filesystem path
    /// `notify` reported; it is translated back to a logical path relative
    /// to the mudlib root before being handed to the reloader.
    pub fn handle_deleted_path(&mut self, root: &Path, path: &Path) {
        let Ok(relative) = path.strip_prefix(root) else { return };
        let logical = format!("/{}", relative.to_string_lossy().replace('\\', "/"));
        self.bridge.handle_file_deletion(&logical);
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            uptime_secs: self.start.elapsed().as_secs(),
            connected_players: self.bridge.all_players().len(),
            active_heartbeats: self.bridge.heartbeat_count(),
            pending_callouts: self.bridge.pending_callout_count(),
            active_sessions: self.bridge.active_session_count(),
        }
    }

    /// Flush every logged-in player's property bag to disk (§10.5 "Graceful
    /// shutdown").
    pub async fn save_all_players(&self) {
        for player in self.bridge.all_players() {
            let Some(name) = self.bridge.player_name_of(&player) else { continue };
            let Some(data) = self.bridge.snapshot_properties(&player) else { continue };
            if let Err(error) = self.bridge.save_player(&name, &data).await {
                warn!(name, %error, "failed to save player on shutdown");
            }
        }
    }
}

async fn bootstrap_dir(bridge: &mut EfunBridge<SystemClock>, dir: &str) {
    let mut queue = VecDeque::new();
    queue.push_back(dir.to_string());
    while let Some(current) = queue.pop_front() {
        let entries = match bridge.vfs().read_dir(&current).await {
            Ok(entries) => entries,
            Err(mf_vfs::VfsError::NotFound(_)) => continue,
            Err(error) => {
                warn!(dir = %current, %error, "failed to scan blueprint directory");
                continue;
            }
        };
        for entry in entries {
            let path = format!("{current}/{}", entry.name);
            if entry.is_dir {
                queue.push_back(path);
                continue;
            }
            match bridge.reload_object(&path) {
                outcomes if outcomes.is_empty() => {}
                outcomes => {
                    for (path, result) in outcomes {
                        if let Err(error) = result {
                            warn!(path, %error, "blueprint failed to compile at startup");
                        } else if dir == "/areas" {
                            if let Some(record) = bridge.registry().find_blueprint(&path) {
                                record.set_is_room(true);
                            }
                        }
                    }
                }
            }
        }
    }
}
