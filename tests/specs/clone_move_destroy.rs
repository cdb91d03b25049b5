// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! §8 scenario 1: clone, move, destroy.

use std::sync::Arc;

use mf_core::{EmptyClass, ObjectId};

use super::prelude::Scenario;

#[tokio::test]
async fn clone_move_and_destroy_keep_containment_consistent() {
    let mut world = Scenario::new();
    world.bridge.registry_mut().register_blueprint("/std/item", Arc::new(EmptyClass));
    world.bridge.registry_mut().register_blueprint("/std/room", Arc::new(EmptyClass));

    let room = world.bridge.clone_object("/std/room").expect("clone room");
    assert_eq!(room, ObjectId::clone_of("/std/room", 1));

    let item = world.bridge.clone_object("/std/item").expect("clone item");
    assert_eq!(item, ObjectId::clone_of("/std/item", 1));

    world.bridge.move_object(&item, Some(&room)).expect("move item into room");
    similar_asserts::assert_eq!(world.bridge.all_inventory(&room), vec![item.clone()]);
    assert_eq!(world.bridge.environment(&item), Some(room.clone()));

    assert!(world.bridge.destruct(&item));
    assert!(world.bridge.all_inventory(&room).is_empty());
    assert!(world.bridge.find_object(item.as_str()).is_none());
}
