// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! §8 scenario 6: permission gate.

use super::prelude::Scenario;

const PROTECTED: &str = "/std/room.ts";

async fn gated_write(world: &Scenario, caller: &str, contents: &str) -> bool {
    if !world.bridge.check_write_permission(caller, PROTECTED) {
        return false;
    }
    world.bridge.write_file(PROTECTED, contents).await.expect("write_file");
    true
}

#[tokio::test]
async fn a_level_zero_player_cannot_write_a_protected_path_until_promoted() {
    let mut world = Scenario::new();

    // Bootstrap the first administrator (allowed with no caller context only
    // while none exists yet, §4.2), then have them protect the path.
    let admin_result = world.bridge.set_permission_level(None, "root", 3);
    assert!(admin_result.success);
    let protect_result = world.bridge.add_protected_path("root", PROTECTED);
    assert!(protect_result.success);

    assert!(!world.bridge.check_write_permission("newbie", PROTECTED));
    assert!(!gated_write(&world, "newbie", "malicious contents").await);
    assert!(!world.bridge.file_exists(PROTECTED).await.expect("file_exists"));

    let promote_result = world.bridge.set_permission_level(Some("root"), "newbie", 3);
    assert!(promote_result.success);

    assert!(world.bridge.check_write_permission("newbie", PROTECTED));
    assert!(gated_write(&world, "newbie", "a cozy little room").await);
    assert_eq!(world.bridge.read_file(PROTECTED).await.expect("read_file"), "a cozy little room");
}
