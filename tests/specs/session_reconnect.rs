// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! §8 scenario 5: session reuse across reconnect.

use std::sync::Arc;

use mf_core::{ConnectionId, EmptyClass, FakeClock};
use mf_dispatch::{HandlerStacks, NoExit, PagerOptions};

use super::prelude::Scenario;

#[tokio::test]
async fn reconnecting_with_a_valid_token_restores_the_same_player() {
    let mut world = Scenario::new();
    world.bridge.registry_mut().register_blueprint("/std/player", Arc::new(EmptyClass));
    world.bridge.registry_mut().register_blueprint("/std/room", Arc::new(EmptyClass));

    let room = world.bridge.clone_object("/std/room").expect("clone room");
    let player = world.bridge.clone_object("/std/player").expect("clone player");
    world.bridge.move_object(&player, Some(&room)).expect("place player in room");
    world.bridge.register_active_player("alice", player.clone());

    let c1 = ConnectionId::new();
    world.bridge.bind_player_to_connection("alice", c1);
    let token = world.bridge.issue_session("alice", c1, "127.0.0.1");

    // A pending pager handler stands in for "input-handler stack ... unchanged".
    let mut stacks: HandlerStacks<FakeClock> = HandlerStacks::new();
    mf_dispatch::page(
        &mut world.bridge,
        &mut stacks,
        "alice",
        &player,
        &(1..=50).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n"),
        PagerOptions { lines_per_page: 10, ..Default::default() },
        Box::new(NoExit),
    );
    assert!(!stacks.is_empty("alice"));

    // C1 drops; the session is retained (§4.11 "no active connection" keeps
    // the record around until a reconnect or a sweep).
    let c2 = ConnectionId::new();
    let name = world.bridge.validate_session(&token, Some("127.0.0.1")).expect("token still valid");
    assert_eq!(name, "alice");

    let player_before = world.bridge.find_active_player(&name).expect("player still active");
    assert_eq!(player_before, player);
    assert_eq!(world.bridge.environment(&player_before), Some(room.clone()));

    world.bridge.transfer_connection(&name, c2);
    world.bridge.invalidate_player_sessions(&name);

    assert_eq!(world.bridge.find_active_player("alice"), Some(player.clone()));
    assert_eq!(world.bridge.environment(&player), Some(room));
    assert!(!stacks.is_empty("alice"));

    assert_eq!(world.bridge.find_connected_player(c2), Some("alice".to_string()));
    assert_eq!(world.bridge.find_connected_player(c1), None);
}
