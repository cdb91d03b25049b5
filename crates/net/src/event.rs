// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! World events produced by connection tasks and consumed by the single
//! world-owning task (§5): one inbound line, one connect, or one
//! disconnect, serialized through an `mpsc` channel so registry/session/
//! scheduler mutation stays on one thread while transport I/O runs on
//! `tokio`'s multi-threaded reactor.

use mf_core::ConnectionId;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// A new connection completed its handshake and is `Unbound`.
    Connected { connection: ConnectionId, remote_addr: String },
    /// A raw input line arrived on `channel: "input"`.
    Line { connection: ConnectionId, line: String },
    /// A modal response arrived on `channel: "gui"`.
    GuiResponse { connection: ConnectionId, payload: Value },
    /// The socket closed or faulted; any bound player should be unbound.
    Disconnected { connection: ConnectionId },
}
