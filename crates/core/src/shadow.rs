// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shadow composition (§4.4): transparent behavioural overlays.
//!
//! Rust has no ambient proxy mechanism, so per §9's "Dynamic dispatch
//! through shadows" note, lookups go through an explicit
//! resolution function ([`ShadowRegistry::find_method`] /
//! [`ShadowRegistry::find_property`]) that every engine-internal access
//! uses, rather than a transparent wrapper object.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::ShadowError;
use crate::id::{ObjectId, ShadowId};
use crate::property::PropertyValue;

/// Behaviour a shadow overlay contributes. Shadows that only intercept a
/// subset of properties/methods leave the rest at their default (not
/// defined), so lookups fall through to the next shadow or the target.
pub trait ShadowBehavior: Send + Sync {
    fn shadow_type(&self) -> &str;

    fn has_method(&self, _name: &str) -> bool {
        false
    }

    fn has_property(&self, _name: &str) -> bool {
        false
    }

    fn get_property(&self, _name: &str) -> Option<PropertyValue> {
        None
    }

    fn on_attach(&self, _target: &ObjectId) {}
    fn on_detach(&self, _target: &ObjectId) {}
}

struct ShadowEntry {
    id: ShadowId,
    priority: i32,
    active: bool,
    behavior: Arc<dyn ShadowBehavior>,
}

/// Ordered stacks of shadow overlays, one per target object (§3 "Shadow
/// overlay", §4.4).
#[derive(Default)]
pub struct ShadowRegistry {
    stacks: HashMap<ObjectId, Vec<ShadowEntry>>,
}

impl ShadowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shadow(
        &mut self,
        target: &ObjectId,
        id: ShadowId,
        priority: i32,
        behavior: Arc<dyn ShadowBehavior>,
    ) -> Result<(), ShadowError> {
        let stack = self.stacks.entry(target.clone()).or_default();
        if stack.iter().any(|e| e.id == id) {
            return Err(ShadowError::AlreadyAttached(id));
        }
        stack.push(ShadowEntry { id, priority, active: true, behavior: behavior.clone() });
        stack.sort_by_key(|e| std::cmp::Reverse(e.priority));
        behavior.on_attach(target);
        debug!(%target, %id, priority, "shadow attached");
        Ok(())
    }

    pub fn remove_shadow(&mut self, target: &ObjectId, id: ShadowId) -> Result<(), ShadowError> {
        let stack = self.stacks.get_mut(target).ok_or(ShadowError::NoSuchShadow(id))?;
        let pos = stack.iter().position(|e| e.id == id).ok_or(ShadowError::NoSuchShadow(id))?;
        let entry = stack.remove(pos);
        entry.behavior.on_detach(target);
        debug!(%target, %id, "shadow detached");
        Ok(())
    }

    pub fn clear_shadows(&mut self, target: &ObjectId) {
        if let Some(stack) = self.stacks.remove(target) {
            for entry in stack {
                entry.behavior.on_detach(target);
            }
        }
    }

    pub fn set_active(&mut self, target: &ObjectId, id: ShadowId, active: bool) -> Result<(), ShadowError> {
        let stack = self.stacks.get_mut(target).ok_or(ShadowError::NoSuchShadow(id))?;
        let entry = stack.iter_mut().find(|e| e.id == id).ok_or(ShadowError::NoSuchShadow(id))?;
        entry.active = active;
        Ok(())
    }

    /// Highest-priority *active* shadow of `shadow_type` attached to `target`.
    pub fn find_shadow(&self, target: &ObjectId, shadow_type: &str) -> Option<Arc<dyn ShadowBehavior>> {
        self.stacks
            .get(target)?
            .iter()
            .filter(|e| e.active)
            .find(|e| e.behavior.shadow_type() == shadow_type)
            .map(|e| e.behavior.clone())
    }

    /// Walk the stack highest-to-lowest priority and return the first active
    /// shadow that defines property `name`, per §4.4 resolution semantics.
    pub fn find_property(&self, target: &ObjectId, name: &str) -> Option<PropertyValue> {
        self.stacks.get(target)?.iter().filter(|e| e.active).find_map(|e| {
            if e.behavior.has_property(name) {
                e.behavior.get_property(name)
            } else {
                None
            }
        })
    }

    /// Highest-priority active shadow that defines method `name`, if any.
    pub fn find_method(&self, target: &ObjectId, name: &str) -> Option<Arc<dyn ShadowBehavior>> {
        self.stacks
            .get(target)?
            .iter()
            .filter(|e| e.active)
            .find(|e| e.behavior.has_method(name))
            .map(|e| e.behavior.clone())
    }

    pub fn has_shadows(&self, target: &ObjectId) -> bool {
        self.stacks.get(target).is_some_and(|s| !s.is_empty())
    }

    pub fn shadow_count(&self, target: &ObjectId) -> usize {
        self.stacks.get(target).map_or(0, Vec::len)
    }

    /// `(total targets with shadows, total shadow instances)`, for the
    /// `getShadowStats` efun.
    pub fn stats(&self) -> (usize, usize) {
        let targets = self.stacks.values().filter(|s| !s.is_empty()).count();
        let total = self.stacks.values().map(Vec::len).sum();
        (targets, total)
    }
}

#[cfg(test)]
#[path = "shadow_tests.rs"]
mod tests;
