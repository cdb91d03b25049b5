// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The seam between the object graph and compiled script behaviour.
//!
//! §9 calls out that the source narrows via `"method" in obj` duck-typed
//! checks and asks for discriminated capability interfaces instead. Rather
//! than a shape-inspected dynamic call, a blueprint's compiled behaviour is
//! a concrete [`ObjectClass`] trait object, and the handful of side effects a
//! verb body may perform (sending text, moving the object, scheduling a
//! callout) are a small capability trait, [`ScriptContext`], implemented by
//! the efun bridge. Neither side needs runtime presence checks.

use crate::id::ObjectId;
use crate::property::{PropertyBag, PropertyValue};

/// Side effects a running verb body may request of its host.
///
/// Implemented by the efun bridge; a tree-walking evaluator (see the
/// `mf-script` crate) calls through this trait rather than reaching into
/// engine internals directly.
pub trait ScriptContext {
    fn this_object(&self) -> ObjectId;
    fn this_player(&self) -> Option<ObjectId>;
    fn send(&mut self, target: &ObjectId, message: &str);
    fn move_object(&mut self, object: &ObjectId, destination: &ObjectId) -> Result<(), String>;
    fn call_out(&mut self, object: ObjectId, method: String, args: Vec<PropertyValue>, delay_ms: u64);
}

/// Compiled behaviour for one blueprint path.
///
/// A blueprint's class is held behind a swappable handle so hot-reload (§4.5)
/// can replace it in place: existing clones keep their property bag but
/// immediately resolve methods through the new class.
pub trait ObjectClass: Send + Sync + std::fmt::Debug {
    /// Properties a freshly cloned (or blueprint) instance starts with.
    fn initial_properties(&self) -> PropertyBag;

    fn has_method(&self, name: &str) -> bool;

    /// Invoke `name`, with `properties` as the calling object's own bag
    /// (mutable: `set` statements write back into it).
    fn call_method(
        &self,
        name: &str,
        args: &[PropertyValue],
        properties: &mut PropertyBag,
        ctx: &mut dyn ScriptContext,
    ) -> Result<PropertyValue, String>;
}

/// A trivial class with no properties and no methods, used for `/std`
/// blueprints that exist only as containers (e.g. the bootstrap void room)
/// before content compiles a real one in.
#[derive(Debug, Default)]
pub struct EmptyClass;

impl ObjectClass for EmptyClass {
    fn initial_properties(&self) -> PropertyBag {
        PropertyBag::new()
    }

    fn has_method(&self, _name: &str) -> bool {
        false
    }

    fn call_method(
        &self,
        name: &str,
        _args: &[PropertyValue],
        _properties: &mut PropertyBag,
        _ctx: &mut dyn ScriptContext,
    ) -> Result<PropertyValue, String> {
        Err(format!("no such method: {name}"))
    }
}
