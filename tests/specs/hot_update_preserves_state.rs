// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! §8 scenario 3: hot update preserves state.

use super::prelude::Scenario;

const COUNTER_V1: &str = r#"
object "/std/counter" {
    properties {
        count: 0
    }

    verb tick() {
        set count = count + 1
        return count
    }
}
"#;

const COUNTER_V2: &str = r#"
object "/std/counter" {
    properties {
        count: 0
    }

    verb tick() {
        set count = count + 1
        return count
    }

    verb value() {
        return count + 10
    }
}
"#;

#[tokio::test]
async fn hot_reload_adds_a_method_without_disturbing_existing_clone_state() {
    let mut world = Scenario::new();
    world.write_source("/std/counter", COUNTER_V1).await;
    let outcomes = world.bridge.reload_object("/std/counter");
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].1.is_ok());

    let counter = world.bridge.clone_object("/std/counter").expect("clone counter");
    assert!(!world.bridge.has_method(&counter, "value"));

    for expected in [1.0, 2.0, 3.0] {
        let result = world.bridge.invoke_verb(&counter, None, "tick", &[]).expect("tick");
        assert_eq!(result, serde_json::json!(expected));
    }

    let bag = world.bridge.snapshot_properties(&counter).expect("counter has properties");
    assert_eq!(bag.get("count"), Some(&serde_json::json!(3.0)));

    world.write_source("/std/counter", COUNTER_V2).await;
    let outcomes = world.bridge.reload_object("/std/counter");
    assert_eq!(outcomes.len(), 1);
    let refreshed = outcomes[0].1.as_ref().expect("v2 compiles");
    assert_eq!(refreshed.clones_refreshed, 1);

    let bag = world.bridge.snapshot_properties(&counter).expect("counter still registered");
    assert_eq!(bag.get("count"), Some(&serde_json::json!(3.0)));

    assert!(world.bridge.has_method(&counter, "value"));
    let value = world.bridge.invoke_verb(&counter, None, "value", &[]).expect("value");
    assert_eq!(value, serde_json::json!(13.0));
}
