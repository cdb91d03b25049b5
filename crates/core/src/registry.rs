// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The object registry (§4.3): the single source of truth for blueprint and
//! clone identity and the containment graph.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::class::ObjectClass;
use crate::error::RegistryError;
use crate::id::ObjectId;
use crate::object::{BlueprintRecord, Object};

/// A registered object, shared and interior-mutable so multiple subsystems
/// (dispatch, efuns, shadows) can hold a handle to the same live instance.
pub type ObjectHandle = Arc<Mutex<Object>>;

/// Map of blueprint path -> blueprint record, plus every live clone by id.
///
/// Per §9 "Global state", this is an explicitly constructed service, not a
/// module-level singleton: callers own an `ObjectRegistry` and pass it
/// through a context, so tests can stand up an isolated instance per case.
#[derive(Default)]
pub struct ObjectRegistry {
    blueprints: HashMap<String, Arc<BlueprintRecord>>,
    objects: HashMap<ObjectId, ObjectHandle>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the blueprint at `path`.
    ///
    /// Replacing an existing blueprint's class in place is how hot-reload
    /// (§4.5) propagates new behaviour to every live clone without touching
    /// their property bags.
    pub fn register_blueprint(&mut self, path: &str, class: Arc<dyn ObjectClass>) -> Arc<BlueprintRecord> {
        if let Some(existing) = self.blueprints.get(path) {
            existing.replace_class(class);
            info!(path, "blueprint class replaced in place");
            return existing.clone();
        }
        let record = Arc::new(BlueprintRecord::new(path, class.clone()));
        let obj = Object::new_blueprint(path, class.initial_properties());
        self.objects.insert(obj.id.clone(), Arc::new(Mutex::new(obj)));
        self.blueprints.insert(path.to_string(), record.clone());
        debug!(path, "blueprint registered");
        record
    }

    pub fn find_blueprint(&self, path: &str) -> Option<Arc<BlueprintRecord>> {
        self.blueprints.get(path).cloned()
    }

    /// Look up by either a bare blueprint path or a `path#N` clone id.
    pub fn find(&self, path_or_id: &str) -> Option<ObjectHandle> {
        if let Some(handle) = self.objects.get(path_or_id) {
            if !handle.lock().destructed {
                return Some(handle.clone());
            }
            return None;
        }
        None
    }

    pub fn find_by_id(&self, id: &ObjectId) -> Option<ObjectHandle> {
        self.find(id.as_str())
    }

    /// Create a fresh clone of the blueprint at `path`.
    pub fn clone_object(&mut self, path: &str) -> Result<ObjectHandle, RegistryError> {
        let record = self
            .blueprints
            .get(path)
            .cloned()
            .ok_or_else(|| RegistryError::NoSuchBlueprint(path.to_string()))?;
        let id = record.next_clone_id();
        let class = record.class_handle();
        let obj = Object::new_clone(id.clone(), path, class.initial_properties());
        let handle = Arc::new(Mutex::new(obj));
        self.objects.insert(id.clone(), handle.clone());
        record.clone_ids.write().insert(id.clone());
        debug!(%id, "clone created");
        Ok(handle)
    }

    /// Move `object` into `destination`, or out of the world entirely when
    /// `destination` is `None`. Maintains the containment biconditional
    /// atomically: either both sides reflect the new placement or, on
    /// failure, both still reflect the old one (§3, §8 "Move atomicity").
    pub fn move_object(
        &self,
        object_id: &ObjectId,
        destination: Option<&ObjectId>,
    ) -> Result<(), RegistryError> {
        let obj_handle = self.find_by_id(object_id).ok_or_else(|| RegistryError::NoSuchObject(object_id.clone()))?;
        let dest_handle = match destination {
            Some(dest_id) => {
                if dest_id == object_id {
                    return Err(RegistryError::Cycle);
                }
                if self.is_ancestor_of(object_id, dest_id) {
                    return Err(RegistryError::Cycle);
                }
                Some(self.find_by_id(dest_id).ok_or_else(|| RegistryError::NoSuchObject(dest_id.clone()))?)
            }
            None => None,
        };

        // Detach from the current environment first.
        let old_env = obj_handle.lock().environment.clone();
        if let Some(old_env_id) = &old_env {
            if let Some(old_env_handle) = self.find_by_id(old_env_id) {
                old_env_handle.lock().inventory.retain(|id| id != object_id);
            }
        }

        match dest_handle {
            Some(dest) => {
                dest.lock().inventory.push(object_id.clone());
                obj_handle.lock().environment = Some(destination.unwrap().clone());
            }
            None => {
                obj_handle.lock().environment = None;
            }
        }
        debug!(%object_id, destination = ?destination, "object moved");
        Ok(())
    }

    fn is_ancestor_of(&self, candidate: &ObjectId, of: &ObjectId) -> bool {
        let mut cur = Some(of.clone());
        while let Some(id) = cur {
            if &id == candidate {
                return true;
            }
            cur = self.find_by_id(&id).and_then(|h| h.lock().environment.clone());
        }
        false
    }

    /// Destroy `object`: detach from environment, mark destructed, remove
    /// from the registry. Idempotent.
    pub fn destroy(&mut self, object_id: &ObjectId) -> bool {
        let Some(handle) = self.objects.get(object_id).cloned() else {
            return false;
        };
        {
            let mut obj = handle.lock();
            if obj.destructed {
                return false;
            }
            obj.destructed = true;
        }
        let _ = self.move_object(object_id, None);
        self.objects.remove(object_id);
        if let Some(record) = self.blueprints.get(object_id.blueprint_path()) {
            record.clone_ids.write().remove(object_id);
        }
        info!(%object_id, "object destroyed");
        true
    }

    /// Destroy every clone of `path`, then remove the blueprint itself.
    pub fn unregister_blueprint(&mut self, path: &str) -> bool {
        let Some(record) = self.blueprints.remove(path) else {
            return false;
        };
        let clone_ids: Vec<_> = record.clone_ids.read().iter().cloned().collect();
        for id in clone_ids {
            self.destroy(&id);
        }
        self.objects.remove(&ObjectId::blueprint(path));
        warn!(path, "blueprint unregistered");
        true
    }

    pub fn clone_ids_of(&self, path: &str) -> Vec<ObjectId> {
        self.blueprints.get(path).map(|r| r.clone_ids.read().iter().cloned().collect()).unwrap_or_default()
    }

    pub fn all_object_ids(&self) -> Vec<ObjectId> {
        self.objects.keys().cloned().collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "registry_proptests.rs"]
mod proptests;
