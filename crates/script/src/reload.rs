// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hot reload (§4.5): explicit blueprint updates, dependency-aware
//! propagation, and a deletion-only file watcher.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use mf_core::ObjectId;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use tracing::{debug, info, warn};

use crate::compiler::{compile, CompiledModule};
use crate::error::CompileError;

/// Everything the hot-reloader needs from the rest of the driver, kept
/// behind a trait so `mf-script` never depends on the object registry's
/// concrete wiring (mirrors the `ScriptContext` seam in `mf-core`).
pub trait ReloadHost {
    /// Read the source text for the blueprint at `path`.
    fn read_source(&self, path: &str) -> std::io::Result<String>;
    /// Install `module` as the class for `path`, returning the number of
    /// existing clones whose method table now resolves through it.
    fn register(&mut self, path: &str, module: CompiledModule) -> usize;
    /// `true` if `path` is on the hot-reload safelist (never auto-unregistered).
    fn is_safelisted(&self, path: &str) -> bool;
    /// `true` if `path` is a room blueprint.
    fn is_room(&self, path: &str) -> bool;
    /// Objects currently inside the room blueprint at `path`.
    fn room_occupants(&self, path: &str) -> Vec<ObjectId>;
    /// Send a one-line notice to an occupant before evacuating it.
    fn notify_occupant(&mut self, occupant: &ObjectId, message: &str);
    /// Move `occupant` into the fallback void room.
    fn evacuate(&mut self, occupant: &ObjectId);
    /// Remove the blueprint and destroy all its clones.
    fn unregister(&mut self, path: &str);
}

/// Outcome of a successful explicit update (§4.5 "count and report").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub path: String,
    pub clones_refreshed: usize,
}

/// Dependency-aware hot reloader: compiles sources and walks the
/// depends-on/depended-by graph recorded from each module's `depends on`
/// declarations.
pub struct HotReloader {
    depends_on: HashMap<String, HashSet<String>>,
    depended_by: HashMap<String, HashSet<String>>,
}

impl Default for HotReloader {
    fn default() -> Self {
        Self::new()
    }
}

impl HotReloader {
    pub fn new() -> Self {
        Self { depends_on: HashMap::new(), depended_by: HashMap::new() }
    }

    /// Compile the source at `path` and, on success, install it via `host`.
    /// On failure, the existing blueprint (if any) is left untouched.
    pub fn update(&mut self, host: &mut dyn ReloadHost, path: &str) -> Result<UpdateOutcome, CompileError> {
        let source = host.read_source(path).map_err(|e| CompileError::UnexpectedEof {
            expected: format!("readable source at {path}: {e}"),
        })?;
        let module = compile(&source)?;

        let mut deps = HashSet::new();
        for dep in &module.depends_on {
            deps.insert(dep.clone());
            self.depended_by.entry(dep.clone()).or_default().insert(path.to_string());
        }
        self.depends_on.insert(path.to_string(), deps);

        let refreshed = host.register(path, module);
        info!(path, refreshed, "blueprint reloaded");
        Ok(UpdateOutcome { path: path.to_string(), clones_refreshed: refreshed })
    }

    /// Update `path`, and on success, every blueprint that depends on it,
    /// breadth-first. A branch stops the moment a node's update fails; it
    /// never blocks sibling branches. Results are in visit order.
    pub fn update_with_dependents(
        &mut self,
        host: &mut dyn ReloadHost,
        path: &str,
    ) -> Vec<(String, Result<UpdateOutcome, CompileError>)> {
        let mut results = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(path.to_string());
        visited.insert(path.to_string());

        while let Some(current) = queue.pop_front() {
            let outcome = self.update(host, &current);
            let succeeded = outcome.is_ok();
            results.push((current.clone(), outcome));
            if !succeeded {
                continue;
            }
            if let Some(dependents) = self.depended_by.get(&current) {
                for dependent in dependents {
                    if visited.insert(dependent.clone()) {
                        queue.push_back(dependent.clone());
                    }
                }
            }
        }
        results
    }

    /// Handle a file deletion: evacuate occupants if the blueprint is a
    /// populated room, then unregister and destroy its clones. Safelisted
    /// blueprints are left alone.
    pub fn handle_deletion(&mut self, host: &mut dyn ReloadHost, path: &str) {
        if host.is_safelisted(path) {
            debug!(path, "deleted file is safelisted, ignoring");
            return;
        }
        if host.is_room(path) {
            for occupant in host.room_occupants(path) {
                host.notify_occupant(&occupant, "The room around you dissolves; you are pulled to safety.");
                host.evacuate(&occupant);
            }
        }
        host.unregister(path);
        self.depends_on.remove(path);
        self.depended_by.remove(path);
        warn!(path, "blueprint unregistered after source deletion");
    }
}

/// Directories the deletion watcher never reacts in (§4.5): command modules
/// reload through their own explicit path, and config/data are never
/// registered blueprints.
const SKIPPED_DIR_NAMES: [&str; 3] = ["cmds", "config", "data"];

fn is_skipped(path: &Path) -> bool {
    path.components().any(|c| {
        let s = c.as_os_str().to_string_lossy();
        SKIPPED_DIR_NAMES.contains(&s.as_ref())
    })
}

/// Debounced, deletion-only file watcher over the mudlib root.
pub struct DeletionWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    debounce: Duration,
    last_seen: HashMap<PathBuf, Instant>,
}

impl DeletionWatcher {
    pub fn new(root: &Path, debounce: Duration) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;
        Ok(Self { _watcher: watcher, rx, debounce, last_seen: HashMap::new() })
    }

    /// Drain pending filesystem events, returning debounced deletion paths.
    /// Modifications and creations are discarded per §4.5 ("ignored so
    /// reloads are always explicit").
    pub fn poll_deletions(&mut self) -> Vec<PathBuf> {
        let mut deletions = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if !matches!(event.kind, EventKind::Remove(_)) {
                        continue;
                    }
                    for path in event.paths {
                        if is_skipped(&path) {
                            continue;
                        }
                        let now = Instant::now();
                        if let Some(last) = self.last_seen.get(&path) {
                            if now.duration_since(*last) < self.debounce {
                                continue;
                            }
                        }
                        self.last_seen.insert(path.clone(), now);
                        deletions.push(path);
                    }
                }
                Ok(Err(err)) => warn!(%err, "file watcher error"),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        deletions
    }
}

#[cfg(test)]
#[path = "reload_tests.rs"]
mod tests;
