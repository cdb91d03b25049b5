// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mf-scheduler`: heartbeats and delayed callouts (§4.6).
//!
//! The scheduler only keeps bookkeeping; it never invokes content code
//! itself. Each tick, a caller on the single world-owning task (see §5's
//! "Rust realization of the single-thread invariant") asks for the due work
//! via [`Scheduler::due_heartbeats`] / [`Scheduler::due_callouts`] and
//! dispatches it through the object registry, so this crate stays decoupled
//! from `mf-core`'s `ObjectClass` execution machinery.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use indexmap::IndexSet;
use tracing::{debug, warn};

use mf_core::{CalloutId, Clock, ObjectId, PropertyValue};

/// A pending callout: what to run when it fires.
#[derive(Debug, Clone)]
pub struct CalloutJob {
    pub object: ObjectId,
    pub method: String,
    pub args: Vec<PropertyValue>,
}

struct CalloutEntry {
    due: Instant,
    seq: u64,
    job: CalloutJob,
}

/// Heartbeat ring plus callout timer wheel, both driven by the same
/// single cooperative loop.
pub struct Scheduler<C: Clock> {
    clock: C,
    heartbeat_ring: IndexSet<ObjectId>,
    heartbeat_running: std::collections::HashSet<ObjectId>,
    callouts: HashMap<CalloutId, CalloutEntry>,
    next_seq: u64,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            heartbeat_ring: IndexSet::new(),
            heartbeat_running: std::collections::HashSet::new(),
            callouts: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Enable or disable heartbeats for `object`.
    pub fn set_heartbeat(&mut self, object: ObjectId, enable: bool) {
        if enable {
            self.heartbeat_ring.insert(object);
        } else {
            self.heartbeat_ring.shift_remove(&object);
            self.heartbeat_running.remove(&object);
        }
    }

    pub fn has_heartbeat(&self, object: &ObjectId) -> bool {
        self.heartbeat_ring.contains(object)
    }

    pub fn heartbeat_count(&self) -> usize {
        self.heartbeat_ring.len()
    }

    /// Objects due for a `heartbeat()` call this tick, in round-robin
    /// (insertion) order, skipping any object whose previous tick's
    /// heartbeat hasn't finished yet (§5 "never re-entrant").
    pub fn due_heartbeats(&mut self) -> Vec<ObjectId> {
        let due: Vec<_> = self
            .heartbeat_ring
            .iter()
            .filter(|id| !self.heartbeat_running.contains(*id))
            .cloned()
            .collect();
        for id in &due {
            self.heartbeat_running.insert(id.clone());
        }
        due
    }

    /// Mark a dispatched heartbeat as finished, letting it run again next tick.
    pub fn heartbeat_finished(&mut self, object: &ObjectId) {
        self.heartbeat_running.remove(object);
    }

    /// A heartbeat handler raised an exception: disable it and log, per §4.6.
    pub fn heartbeat_failed(&mut self, object: &ObjectId, error: &str) {
        warn!(%object, error, "heartbeat disabled after exception");
        self.set_heartbeat(object.clone(), false);
    }

    /// Schedule `job` to run at least `delay_ms` from now.
    pub fn call_out(&mut self, job: CalloutJob, delay_ms: u64) -> CalloutId {
        let id = CalloutId::new();
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.clock.now() + Duration::from_millis(delay_ms);
        debug!(%id, delay_ms, "callout scheduled");
        self.callouts.insert(id, CalloutEntry { due, seq, job });
        id
    }

    /// Cancel a pending callout. Safe (returns `false`) even after it has
    /// already fired or been cancelled once.
    pub fn remove_call_out(&mut self, id: CalloutId) -> bool {
        self.callouts.remove(&id).is_some()
    }

    pub fn pending_callout_count(&self) -> usize {
        self.callouts.len()
    }

    /// Every callout whose due time has arrived, ordered by due time and
    /// then scheduling order for ties (§5 "Callout firing order").
    pub fn due_callouts(&mut self) -> Vec<(CalloutId, CalloutJob)> {
        let now = self.clock.now();
        let mut due_ids: Vec<_> = self
            .callouts
            .iter()
            .filter(|(_, entry)| entry.due <= now)
            .map(|(id, entry)| (*id, entry.due, entry.seq))
            .collect();
        due_ids.sort_by_key(|(_, due, seq)| (*due, *seq));
        due_ids
            .into_iter()
            .map(|(id, _, _)| {
                let entry = self.callouts.remove(&id).expect("id just collected from the map");
                (id, entry.job)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
