// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The object data model (§3).

use std::collections::HashSet;
use std::time::SystemTime;

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::class::ObjectClass;
use crate::id::ObjectId;
use crate::property::PropertyBag;

/// A verb handler registered directly on an object (as opposed to the
/// global `/cmds/...` table, which lives in `mf-dispatch`).
#[derive(Debug, Clone)]
pub struct ActionEntry {
    pub verb: String,
    pub method: String,
    pub priority: i32,
}

/// An object's on-object action table, keyed by verb.
///
/// Entries with the same verb are tried in priority-descending,
/// then-registration order (§4.8).
#[derive(Debug, Default, Clone)]
pub struct ActionTable {
    by_verb: IndexMap<String, Vec<ActionEntry>>,
}

impl ActionTable {
    pub fn add(&mut self, entry: ActionEntry) {
        let bucket = self.by_verb.entry(entry.verb.clone()).or_default();
        bucket.push(entry);
        bucket.sort_by_key(|e| std::cmp::Reverse(e.priority));
    }

    pub fn remove(&mut self, verb: &str, method: &str) {
        if let Some(bucket) = self.by_verb.get_mut(verb) {
            bucket.retain(|e| e.method != method);
        }
    }

    /// Candidates for `verb`, already ordered by priority then registration.
    pub fn candidates(&self, verb: &str) -> &[ActionEntry] {
        self.by_verb.get(verb).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_verb.values().all(Vec::is_empty)
    }
}

/// One object: a blueprint (one per path) or a clone (`path#N`).
#[derive(Debug, Clone)]
pub struct Object {
    pub id: ObjectId,
    pub blueprint_path: String,
    pub short_desc: String,
    pub long_desc: String,
    pub ids: HashSet<String>,
    pub inventory: Vec<ObjectId>,
    pub environment: Option<ObjectId>,
    pub actions: ActionTable,
    pub properties: PropertyBag,
    pub destructed: bool,
}

impl Object {
    pub fn new_blueprint(path: impl Into<String>, properties: PropertyBag) -> Self {
        let path = path.into();
        Self {
            id: ObjectId::blueprint(path.clone()),
            blueprint_path: path,
            short_desc: String::new(),
            long_desc: String::new(),
            ids: HashSet::new(),
            inventory: Vec::new(),
            environment: None,
            actions: ActionTable::default(),
            properties,
            destructed: false,
        }
    }

    pub fn new_clone(id: ObjectId, blueprint_path: impl Into<String>, properties: PropertyBag) -> Self {
        Self {
            id,
            blueprint_path: blueprint_path.into(),
            short_desc: String::new(),
            long_desc: String::new(),
            ids: HashSet::new(),
            inventory: Vec::new(),
            environment: None,
            actions: ActionTable::default(),
            properties,
            destructed: false,
        }
    }

    pub fn is_blueprint(&self) -> bool {
        self.id.is_blueprint()
    }

    /// `true` if `name` matches one of this object's ids, or its short
    /// description (case-insensitively), used by command dispatch's
    /// noun-phrase resolution.
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.ids.iter().any(|id| id.to_lowercase() == name)
            || self.short_desc.to_lowercase() == name
    }
}

/// Per-path bookkeeping the registry keeps for each loaded blueprint (§3).
#[derive(Debug)]
pub struct BlueprintRecord {
    pub path: String,
    pub class: RwLock<Arc<dyn ObjectClass>>,
    pub clone_ids: RwLock<HashSet<ObjectId>>,
    pub clone_counter: std::sync::atomic::AtomicU64,
    pub source_mtime: RwLock<Option<SystemTime>>,
    pub imports: RwLock<HashSet<String>>,
    /// Safelisted blueprints are left alone by the deletion watcher (§4.5).
    safelisted: std::sync::atomic::AtomicBool,
    /// `true` if this blueprint represents a room (evacuated on deletion).
    is_room: std::sync::atomic::AtomicBool,
}

impl BlueprintRecord {
    pub fn new(path: impl Into<String>, class: Arc<dyn ObjectClass>) -> Self {
        Self {
            path: path.into(),
            class: RwLock::new(class),
            clone_ids: RwLock::new(HashSet::new()),
            clone_counter: std::sync::atomic::AtomicU64::new(0),
            source_mtime: RwLock::new(None),
            imports: RwLock::new(HashSet::new()),
            safelisted: std::sync::atomic::AtomicBool::new(false),
            is_room: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn next_clone_id(&self) -> ObjectId {
        let n = self.clone_counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
        ObjectId::clone_of(&self.path, n)
    }

    pub fn class_handle(&self) -> Arc<dyn ObjectClass> {
        self.class.read().clone()
    }

    pub fn replace_class(&self, class: Arc<dyn ObjectClass>) {
        *self.class.write() = class;
    }

    pub fn is_safelisted(&self) -> bool {
        self.safelisted.load(std::sync::atomic::Ordering::Relaxed)
    }

    pub fn set_safelisted(&self, value: bool) {
        self.safelisted.store(value, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn is_room(&self) -> bool {
        self.is_room.load(std::sync::atomic::Ordering::Relaxed)
    }

    pub fn set_is_room(&self, value: bool) {
        self.is_room.store(value, std::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(test)]
#[path = "object_tests.rs"]
mod tests;
