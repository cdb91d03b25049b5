// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn action_table_orders_by_priority_then_registration() {
    let mut table = ActionTable::default();
    table.add(ActionEntry { verb: "look".into(), method: "low".into(), priority: 1 });
    table.add(ActionEntry { verb: "look".into(), method: "high".into(), priority: 10 });
    table.add(ActionEntry { verb: "look".into(), method: "also_low".into(), priority: 1 });

    let names: Vec<_> = table.candidates("look").iter().map(|e| e.method.as_str()).collect();
    assert_eq!(names, vec!["high", "low", "also_low"]);
}

#[test]
fn action_table_remove_drops_only_matching_method() {
    let mut table = ActionTable::default();
    table.add(ActionEntry { verb: "get".into(), method: "a".into(), priority: 0 });
    table.add(ActionEntry { verb: "get".into(), method: "b".into(), priority: 0 });
    table.remove("get", "a");
    let names: Vec<_> = table.candidates("get").iter().map(|e| e.method.as_str()).collect();
    assert_eq!(names, vec!["b"]);
}

#[test]
fn blueprint_record_issues_increasing_clone_ids() {
    let record = BlueprintRecord::new("/areas/forest/wolf", Arc::new(crate::class::EmptyClass));
    assert_eq!(record.next_clone_id().as_str(), "/areas/forest/wolf#1");
    assert_eq!(record.next_clone_id().as_str(), "/areas/forest/wolf#2");
}

#[test]
fn object_matches_name_is_case_insensitive() {
    let mut obj = Object::new_blueprint("/std/item", PropertyBag::new());
    obj.ids.insert("Sword".to_string());
    assert!(obj.matches_name("sword"));
    assert!(!obj.matches_name("shield"));
}
