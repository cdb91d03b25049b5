// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::mpsc;
use std::sync::Arc;

use super::*;
use crate::command::CommandModule;
use mf_core::{EmptyClass, FakeClock, ObjectRegistry, PermissionLevel, Permissions};
use mf_efun::{ConnectionSink, EfunBridge};
use mf_scheduler::Scheduler;
use mf_session::SessionManager;
use mf_vfs::Vfs;

struct ChannelSink(mpsc::Sender<String>);

impl ConnectionSink for ChannelSink {
    fn send_frame(&mut self, _connection: mf_core::ConnectionId, _channel: &str, payload: serde_json::Value) {
        let _ = self.0.send(payload["text"].as_str().unwrap_or_default().to_string());
    }
    fn close(&mut self, _connection: mf_core::ConnectionId) {}
}

fn wired_bridge(root: &std::path::Path) -> (EfunBridge<FakeClock>, mpsc::Receiver<String>, ObjectId) {
    let clock = FakeClock::new();
    let mut bridge = EfunBridge::new(
        clock.clone(),
        ObjectRegistry::new(),
        Permissions::new(),
        Scheduler::new(clock.clone()),
        SessionManager::new(vec![1, 2, 3, 4], 60_000, false, clock),
        Vfs::new(root),
    );
    let (tx, rx) = mpsc::channel();
    bridge.set_sink(Box::new(ChannelSink(tx)));
    bridge.registry_mut().register_blueprint("/std/player", Arc::new(EmptyClass));
    let player = bridge.clone_object("/std/player").unwrap();
    bridge.register_active_player("wanderer", player.clone());
    bridge.bind_player_to_connection("wanderer", mf_core::ConnectionId::new());
    (bridge, rx, player)
}

#[test]
fn environment_actions_are_tried_before_the_command_table() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bridge, _rx, player) = wired_bridge(dir.path());

    let room_src = r#"
    object "/areas/foyer" {
        properties { opened: false }
        verb try_open(args) {
            set opened = true
            return true
        }
    }
    "#;
    let compiled = mf_script::compile(room_src).unwrap();
    bridge.registry_mut().register_blueprint("/areas/foyer", Arc::new(compiled));
    let room = bridge.clone_object("/areas/foyer").unwrap();
    bridge.add_action(&room, mf_core::ActionEntry { verb: "open".to_string(), method: "try_open".to_string(), priority: 0 });
    bridge.move_object(&player, Some(&room)).unwrap();

    let mut dispatcher: Dispatcher<FakeClock> = Dispatcher::new(CommandTable::new());
    assert!(dispatcher.dispatch(&mut bridge, "wanderer", &player, "open door"));
}

#[test]
fn a_command_below_the_caller_level_is_denied_and_still_consumes_the_line() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bridge, rx, player) = wired_bridge(dir.path());

    let dig_src = r#"
    object "/cmds/builder/dig" {
        properties { name: "dig" }
        verb execute(args) { return true }
    }
    "#;
    let mut table = CommandTable::new();
    table.insert(CommandModule::compile("/cmds/builder/dig".to_string(), PermissionLevel::Builder, dig_src).unwrap());
    let mut dispatcher: Dispatcher<FakeClock> = Dispatcher::new(table);

    assert!(dispatcher.dispatch(&mut bridge, "wanderer", &player, "dig"));
    let msg = rx.recv().unwrap();
    assert!(msg.contains("not permitted"));
}

#[test]
fn an_allowed_command_runs_and_a_false_result_falls_through_to_the_soul_table() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bridge, rx, player) = wired_bridge(dir.path());

    let maybe_src = r#"
    object "/cmds/player/smile" {
        properties { name: "smile" }
        verb execute(args) {
            return false
        }
    }
    "#;
    let mut table = CommandTable::new();
    table.insert(CommandModule::compile("/cmds/player/smile".to_string(), PermissionLevel::Player, maybe_src).unwrap());
    let mut dispatcher: Dispatcher<FakeClock> = Dispatcher::new(table);

    assert!(dispatcher.dispatch(&mut bridge, "wanderer", &player, "smile"));
    let msg = rx.recv().unwrap();
    assert_eq!(msg, "wanderer smiles.");
}

#[test]
fn an_unrecognized_verb_is_not_handled() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bridge, _rx, player) = wired_bridge(dir.path());
    let mut dispatcher: Dispatcher<FakeClock> = Dispatcher::new(CommandTable::new());
    assert!(!dispatcher.dispatch(&mut bridge, "wanderer", &player, "xyzzy"));
}

#[test]
fn executor_adapter_resolves_the_player_name_from_the_connection_table() {
    let dir = tempfile::tempdir().unwrap();
    let (mut bridge, rx, player) = wired_bridge(dir.path());
    let mut dispatcher: Dispatcher<FakeClock> = Dispatcher::new(CommandTable::new());

    let handled = CommandExecutor::execute(&mut dispatcher, &mut bridge, &player, "wave");
    assert!(handled);
    assert_eq!(rx.recv().unwrap(), "wanderer waves.");
}
