// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured status/introspection (§10.5), following the teacher's
//! `Response::Status`-style snapshot: a plain serializable struct an admin
//! command or the `time` channel sync can read without touching internals.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub uptime_secs: u64,
    pub connected_players: usize,
    pub active_heartbeats: usize,
    pub pending_callouts: usize,
    pub active_sessions: usize,
}
