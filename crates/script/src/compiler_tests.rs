// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mf_core::ObjectId;

struct NullContext;

impl ScriptContext for NullContext {
    fn this_object(&self) -> ObjectId {
        ObjectId::from("/std/counter#1")
    }
    fn this_player(&self) -> Option<ObjectId> {
        None
    }
    fn send(&mut self, _target: &ObjectId, _message: &str) {}
    fn move_object(&mut self, _object: &ObjectId, _destination: &ObjectId) -> Result<(), String> {
        Ok(())
    }
    fn call_out(&mut self, _object: ObjectId, _method: String, _args: Vec<PropertyValue>, _delay_ms: u64) {}
}

const COUNTER: &str = r#"
object "/std/counter" {
    properties {
        count: 0
    }

    verb tick() {
        set count = count + 1
        return count
    }

    verb value() {
        return count
    }
}
"#;

#[test]
fn compiles_and_runs_verbs() {
    let module = compile(COUNTER).unwrap();
    assert_eq!(module.path, "/std/counter");
    assert!(module.has_method("tick"));
    assert!(!module.has_method("missing"));

    let mut props = module.initial_properties();
    let mut ctx = NullContext;
    let result = module.call_method("tick", &[], &mut props, &mut ctx).unwrap();
    assert_eq!(result, serde_json::json!(1.0));
    let result = module.call_method("tick", &[], &mut props, &mut ctx).unwrap();
    assert_eq!(result, serde_json::json!(2.0));
}

#[test]
fn hot_reload_preserves_clone_state_across_new_module() {
    // Simulates §8 scenario 3: recompiling adds a method while a clone's
    // property bag (taken from the old module) is carried over untouched.
    let module_v1 = compile(COUNTER).unwrap();
    let mut props = module_v1.initial_properties();
    let mut ctx = NullContext;
    module_v1.call_method("tick", &[], &mut props, &mut ctx).unwrap();
    module_v1.call_method("tick", &[], &mut props, &mut ctx).unwrap();
    module_v1.call_method("tick", &[], &mut props, &mut ctx).unwrap();
    assert_eq!(props.get("count"), Some(&serde_json::json!(3.0)));

    let module_v2 = compile(
        r#"object "/std/counter" {
            properties { count: 0 }
            verb tick() { set count = count + 1 return count }
            verb value() { return count + 10 }
        }"#,
    )
    .unwrap();
    assert!(module_v2.has_method("value"));
    let result = module_v2.call_method("value", &[], &mut props, &mut ctx).unwrap();
    assert_eq!(result, serde_json::json!(13.0));
}

#[test]
fn argument_count_mismatch_errors() {
    let module = compile(r#"object "/x" { verb v(a, b) { return a } }"#).unwrap();
    let mut props = PropertyBag::new();
    let mut ctx = NullContext;
    let err = module.call_method("v", &[serde_json::json!(1)], &mut props, &mut ctx).unwrap_err();
    assert!(err.contains("expected 2"));
}

#[test]
fn non_literal_property_initializer_rejected() {
    let err = compile(r#"object "/x" { properties { count: this } }"#).unwrap_err();
    assert!(matches!(err, CompileError::TypeError { .. }));
}

#[test]
fn calling_unknown_method_errors() {
    let module = compile(r#"object "/x" { verb v() { } }"#).unwrap();
    let mut props = PropertyBag::new();
    let mut ctx = NullContext;
    assert!(module.call_method("missing", &[], &mut props, &mut ctx).is_err());
}
