// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared scaffolding for the end-to-end scenario tests: an [`EfunBridge`]
//! wired against a temporary mudlib root with a [`FakeClock`], plus a
//! [`RecordingSink`] that captures outbound frames instead of pushing them
//! over a socket. Mirrors `mf-dispatch`'s own `wired_bridge()` test helper,
//! scaled up to a whole temp mudlib.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mf_core::{ConnectionId, FakeClock, ObjectRegistry, Permissions};
use mf_efun::{ConnectionSink, EfunBridge};
use mf_scheduler::Scheduler;
use mf_session::SessionManager;
use mf_vfs::Vfs;

const SESSION_TTL_MS: u64 = 60_000;

/// A [`ConnectionSink`] that records every frame in memory, keyed by
/// connection, so a test can assert on exactly what a player would have
/// seen on their terminal.
#[derive(Clone, Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<HashMap<ConnectionId, Vec<(String, serde_json::Value)>>>>,
    closed: Arc<Mutex<Vec<ConnectionId>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `terminal`-channel frame sent to `connection`, as plain text,
    /// in send order.
    pub fn terminal_lines(&self, connection: ConnectionId) -> Vec<String> {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&connection)
            .into_iter()
            .flatten()
            .filter(|(channel, _)| channel == "terminal")
            .map(|(_, payload)| payload["text"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn is_closed(&self, connection: ConnectionId) -> bool {
        self.closed.lock().unwrap_or_else(|e| e.into_inner()).contains(&connection)
    }
}

impl ConnectionSink for RecordingSink {
    fn send_frame(&mut self, connection: ConnectionId, channel: &str, payload: serde_json::Value) {
        self.frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(connection)
            .or_default()
            .push((channel.to_string(), payload));
    }

    fn close(&mut self, connection: ConnectionId) {
        self.closed.lock().unwrap_or_else(|e| e.into_inner()).push(connection);
    }
}

/// A fully wired world for one scenario test: a bridge over a scratch
/// mudlib directory, a fake clock a test can advance deterministically, and
/// a sink it can inspect afterward.
pub struct Scenario {
    pub bridge: EfunBridge<FakeClock>,
    pub clock: FakeClock,
    pub sink: RecordingSink,
    root: tempfile::TempDir,
}

impl Scenario {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create scratch mudlib root");
        let clock = FakeClock::new();
        let sink = RecordingSink::new();
        let mut bridge = EfunBridge::new(
            clock.clone(),
            ObjectRegistry::new(),
            Permissions::new(),
            Scheduler::new(clock.clone()),
            SessionManager::new(vec![7, 7, 7, 7], SESSION_TTL_MS, false, clock.clone()),
            Vfs::new(root.path()),
        );
        bridge.set_sink(Box::new(sink.clone()));
        Self { bridge, clock, sink, root }
    }

    /// Write a DSL source file at a logical mudlib path (e.g. `/std/counter`),
    /// creating parent directories as needed.
    pub async fn write_source(&self, logical_path: &str, source: &str) {
        self.bridge
            .vfs()
            .write(logical_path, source.as_bytes())
            .await
            .unwrap_or_else(|e| panic!("writing {logical_path}: {e}"));
    }

    pub async fn delete_source(&self, logical_path: &str) {
        self.bridge
            .vfs()
            .remove_file(logical_path)
            .await
            .unwrap_or_else(|e| panic!("deleting {logical_path}: {e}"));
    }

    pub fn root_path(&self) -> &std::path::Path {
        self.root.path()
    }
}
