// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mf_core::ObjectId;

#[test]
fn bind_then_find_round_trips_both_directions() {
    let mut table = ConnectionTable::new();
    let conn = ConnectionId::new();
    table.bind("Alice", conn);
    assert_eq!(table.find_connection("alice"), Some(conn));
    assert_eq!(table.find_player(conn), Some("alice".to_string()));
}

#[test]
fn transfer_moves_binding_and_drops_old_connection() {
    let mut table = ConnectionTable::new();
    let old_conn = ConnectionId::new();
    let new_conn = ConnectionId::new();
    table.bind("bob", old_conn);

    let returned_old = table.transfer("bob", new_conn);

    assert_eq!(returned_old, Some(old_conn));
    assert_eq!(table.find_connection("bob"), Some(new_conn));
    assert_eq!(table.find_player(old_conn), None);
    assert_eq!(table.find_player(new_conn), Some("bob".to_string()));
}

#[test]
fn unbind_connection_clears_both_maps() {
    let mut table = ConnectionTable::new();
    let conn = ConnectionId::new();
    table.bind("carol", conn);

    table.unbind_connection(conn);

    assert_eq!(table.find_connection("carol"), None);
    assert_eq!(table.find_player(conn), None);
}

#[test]
fn active_player_registration_is_case_insensitive() {
    let mut table = ConnectionTable::new();
    let object = ObjectId::blueprint("/std/player");
    table.register_active_player("Dave", object.clone());

    assert_eq!(table.find_active_player("dave"), Some(object));
    assert_eq!(table.all_active_players().len(), 1);

    table.unregister_active_player("DAVE");
    assert_eq!(table.find_active_player("dave"), None);
    assert!(table.all_active_players().is_empty());
}

#[test]
fn player_name_of_reverse_lookup_clears_on_unregister() {
    let mut table = ConnectionTable::new();
    let object = ObjectId::blueprint("/std/player");
    table.register_active_player("Eve", object.clone());

    assert_eq!(table.player_name_of(&object), Some("eve"));

    table.unregister_active_player("eve");
    assert_eq!(table.player_name_of(&object), None);
}
