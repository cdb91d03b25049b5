// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! §8 scenario 2: room deletion evacuation.

use std::sync::Arc;

use mf_core::{EmptyClass, ObjectId};

use super::prelude::Scenario;

const ROOM: &str = "/areas/x/y";
const VOID: &str = "/std/void";

#[tokio::test]
async fn deleting_an_occupied_room_source_evacuates_its_occupants() {
    let mut world = Scenario::new();
    world.bridge.registry_mut().register_blueprint(VOID, Arc::new(EmptyClass));
    world.bridge.set_void_room(ObjectId::blueprint(VOID));
    world.bridge.registry_mut().register_blueprint("/std/player", Arc::new(EmptyClass));

    world.write_source(ROOM, &format!("object \"{ROOM}\" {{ }}")).await;
    let outcomes = world.bridge.reload_object(ROOM);
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].1.is_ok());
    world
        .bridge
        .registry()
        .find_blueprint(ROOM)
        .expect("room blueprint registered")
        .set_is_room(true);

    // Area rooms are addressed by their blueprint object directly, not a
    // numbered clone (only clonable content like items and NPCs is cloned).
    let room = ObjectId::blueprint(ROOM);
    let player = world.bridge.clone_object("/std/player").expect("clone player");
    world.bridge.move_object(&player, Some(&room)).expect("move player into room");

    world.delete_source(ROOM).await;
    world.bridge.handle_file_deletion(ROOM);

    assert_eq!(world.bridge.environment(&player), Some(ObjectId::blueprint(VOID)));
    assert!(world.bridge.find_object(room.as_str()).is_none());
}
