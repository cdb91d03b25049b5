// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection-facing efuns (§4.7 "Connection") and the bookkeeping they
//! need: which player is bound to which connection, and the active-player
//! table consulted by `findActivePlayer`.
//!
//! Socket I/O itself lives in `mf-net`; this crate only needs a narrow
//! capability to push a frame or close a socket, expressed as
//! [`ConnectionSink`] so the dependency points from the transport layer
//! toward the efun bridge's vocabulary types, not the other way round
//! (mirrors the `ScriptContext`/`ReloadHost` seams elsewhere in the
//! workspace).

use std::collections::HashMap;

use mf_core::{Clock, ConnectionId, ObjectId};
use tracing::{info, warn};

use crate::bridge::EfunBridge;

/// The capability the efun bridge needs from the transport layer: push a
/// channel-typed frame, or close a connection outright.
pub trait ConnectionSink: Send {
    fn send_frame(&mut self, connection: ConnectionId, channel: &str, payload: serde_json::Value);
    fn close(&mut self, connection: ConnectionId);
}

/// Capability to run a dispatched command line, implemented by the command
/// dispatcher. `executeCommand` (§4.7 "Connection") needs this but the
/// dispatcher cannot own the bridge outright — it needs to read the object
/// graph, resolve actions and send output through it — so `execute` takes
/// the bridge back as a parameter rather than holding its own handle
/// (mirrors the `std::mem::take`-and-restore dance hot reload already uses
/// for the same self-referential shape).
pub trait CommandExecutor<C: Clock>: Send {
    /// Dispatch `line` as if typed by `player`. Returns `true` if some
    /// handler consumed it.
    fn execute(&mut self, bridge: &mut EfunBridge<C>, player: &ObjectId, line: &str) -> bool;
}

/// A sink that drops everything, logging a warning. Used when the driver
/// runs efuns with no transport attached (e.g. offline scripting tools).
#[derive(Default)]
pub struct NullSink;

impl ConnectionSink for NullSink {
    fn send_frame(&mut self, connection: ConnectionId, channel: &str, _payload: serde_json::Value) {
        warn!(%connection, channel, "dropped frame: no connection sink attached");
    }
    fn close(&mut self, connection: ConnectionId) {
        warn!(%connection, "close requested: no connection sink attached");
    }
}

/// Bookkeeping for §3's "Connection record" / §4.11 bind-transfer dance,
/// kept separate from the raw socket state that `mf-net` owns.
#[derive(Default)]
pub struct ConnectionTable {
    player_to_connection: HashMap<String, ConnectionId>,
    connection_to_player: HashMap<ConnectionId, String>,
    active_players: HashMap<String, ObjectId>,
    player_of_object: HashMap<ObjectId, String>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `player` to `connection`. If the player already has a bound
    /// connection, the caller should use [`Self::transfer`] instead.
    pub fn bind(&mut self, player: &str, connection: ConnectionId) {
        let player = player.to_lowercase();
        self.player_to_connection.insert(player.clone(), connection);
        self.connection_to_player.insert(connection, player);
    }

    pub fn find_connection(&self, player: &str) -> Option<ConnectionId> {
        self.player_to_connection.get(&player.to_lowercase()).copied()
    }

    pub fn find_player(&self, connection: ConnectionId) -> Option<String> {
        self.connection_to_player.get(&connection).cloned()
    }

    /// Move `player`'s binding from its old connection to `new_connection`,
    /// returning the old connection id (now `Closing` in the caller's state
    /// machine) if one existed (§4.11).
    pub fn transfer(&mut self, player: &str, new_connection: ConnectionId) -> Option<ConnectionId> {
        let player = player.to_lowercase();
        let old = self.player_to_connection.insert(player.clone(), new_connection);
        if let Some(old_conn) = old {
            self.connection_to_player.remove(&old_conn);
        }
        self.connection_to_player.insert(new_connection, player.clone());
        info!(player, "connection transferred");
        old
    }

    pub fn unbind_connection(&mut self, connection: ConnectionId) {
        if let Some(player) = self.connection_to_player.remove(&connection) {
            self.player_to_connection.remove(&player);
        }
    }

    pub fn register_active_player(&mut self, name: &str, object: ObjectId) {
        let name = name.to_lowercase();
        self.player_of_object.insert(object.clone(), name.clone());
        self.active_players.insert(name, object);
    }

    pub fn unregister_active_player(&mut self, name: &str) {
        if let Some(object) = self.active_players.remove(&name.to_lowercase()) {
            self.player_of_object.remove(&object);
        }
    }

    pub fn find_active_player(&self, name: &str) -> Option<ObjectId> {
        self.active_players.get(&name.to_lowercase()).cloned()
    }

    pub fn all_active_players(&self) -> Vec<ObjectId> {
        self.active_players.values().cloned().collect()
    }

    /// The logged-in player name bound to `object`, if it is a registered
    /// active player.
    pub fn player_name_of(&self, object: &ObjectId) -> Option<&str> {
        self.player_of_object.get(object).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
