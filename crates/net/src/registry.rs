// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The live-connection table and the [`ConnectionSink`] implementation that
//! lets the world-owning task push frames to a connection's writer task
//! without blocking (§5 "Rust realization of the single-thread invariant":
//! the registry is the hand-off point between the synchronous efun bridge
//! and the async transport tasks).

use std::collections::HashMap;
use std::sync::Arc;

use mf_core::ConnectionId;
use mf_efun::ConnectionSink;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::frame::OutboundFrame;
use crate::state::ConnectionState;

/// A message handed to one connection's writer task.
pub enum WriterMsg {
    Frame(String),
    Close,
}

struct Entry {
    outbound: mpsc::UnboundedSender<WriterMsg>,
    state: ConnectionState,
}

/// Bookkeeping for every live connection's outbound channel and state
/// (§4.11). Shared between the accept loop, each connection's tasks, and
/// the [`ConnectionSink`] the world task writes through.
#[derive(Default)]
pub struct ConnectionRegistry {
    entries: Mutex<HashMap<ConnectionId, Entry>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, connection: ConnectionId, outbound: mpsc::UnboundedSender<WriterMsg>) {
        self.entries.lock().insert(connection, Entry { outbound, state: ConnectionState::Accepting });
    }

    pub fn set_state(&self, connection: ConnectionId, state: ConnectionState) {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(&connection) else { return };
        match entry.state.transition(state) {
            Ok(next) => entry.state = next,
            Err(error) => warn!(%connection, %error, "dropped invalid connection state transition"),
        }
    }

    pub fn state_of(&self, connection: ConnectionId) -> Option<ConnectionState> {
        self.entries.lock().get(&connection).map(|e| e.state)
    }

    pub fn remove(&self, connection: ConnectionId) {
        self.entries.lock().remove(&connection);
    }
}

/// The [`ConnectionSink`] wired into the efun bridge: frames are encoded
/// and size-checked here, then handed to the target connection's writer
/// task over an unbounded channel so the (synchronous) world task never
/// blocks on socket backpressure.
pub struct NetSink {
    registry: Arc<ConnectionRegistry>,
}

impl NetSink {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

impl ConnectionSink for NetSink {
    fn send_frame(&mut self, connection: ConnectionId, channel: &str, payload: Value) {
        let entries = self.registry.entries.lock();
        let Some(entry) = entries.get(&connection) else {
            debug!(%connection, channel, "dropped frame: no such connection");
            return;
        };
        if matches!(entry.state, ConnectionState::Closing | ConnectionState::Closed) {
            debug!(%connection, channel, "dropped frame: connection is closing");
            return;
        }
        let frame = OutboundFrame::new(channel, payload);
        match frame.encode() {
            Ok(text) => {
                if entry.outbound.send(WriterMsg::Frame(text)).is_err() {
                    debug!(%connection, channel, "dropped frame: writer task gone");
                }
            }
            Err(error) => warn!(%connection, channel, %error, "dropped oversized or malformed frame"),
        }
    }

    fn close(&mut self, connection: ConnectionId) {
        let mut entries = self.registry.entries.lock();
        let Some(entry) = entries.get_mut(&connection) else { return };
        if let Ok(next) = entry.state.transition(ConnectionState::Closing) {
            entry.state = next;
        }
        let _ = entry.outbound.send(WriterMsg::Close);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
