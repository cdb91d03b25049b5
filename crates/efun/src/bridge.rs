// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The efun bridge (§4.7): the single object through which every
//! user-script capability flows.
//!
//! One [`EfunBridge`] is constructed per running world. It owns the object
//! registry, shadow registry, permission table, scheduler, session manager
//! and virtual filesystem outright, and implements `mf_core::ScriptContext`
//! so compiled verb bodies (`mf-script`) can reach them without depending on
//! this crate's concrete type. Command dispatch and outbound transport are
//! the other direction of the same seam: the bridge holds capability traits
//! ([`ConnectionSink`], [`CommandExecutor`]) the driver wires in once both
//! sides exist, so neither this crate nor `mf-dispatch`/`mf-net` has to
//! depend on the other.

use std::cell::RefCell;
use std::sync::Arc;

use mf_core::{
    ActionEntry, CalloutId, Clock, ConnectionId, ObjectHandle, ObjectId, ObjectRegistry,
    PermissionLevel, Permissions, PropertyBag, PropertyValue, ScriptContext, ShadowBehavior,
    ShadowId, ShadowRegistry,
};
use mf_scheduler::{CalloutJob, Scheduler};
use mf_script::{CompileError, HotReloader, ReloadHost, UpdateOutcome};
use mf_session::SessionManager;
use mf_vfs::Vfs;
use tracing::{debug, warn};

use crate::connection::{CommandExecutor, ConnectionSink, ConnectionTable, NullSink};
use crate::error::{AdminResult, EfunError};
use crate::utility;

const PLAYERS_DIR: &str = "/data/players";

fn player_data_path(name: &str) -> String {
    format!("{PLAYERS_DIR}/{}.json", name.to_lowercase())
}

/// The efun bridge itself. Generic over [`Clock`] so tests can drive the
/// scheduler and session TTL deterministically with `mf_core::FakeClock`.
pub struct EfunBridge<C: Clock> {
    clock: C,
    registry: ObjectRegistry,
    shadows: ShadowRegistry,
    permissions: Permissions,
    scheduler: Scheduler<C>,
    sessions: SessionManager<C>,
    vfs: Vfs,
    connections: ConnectionTable,
    reloader: HotReloader,
    sink: Box<dyn ConnectionSink>,
    executor: Option<Box<dyn CommandExecutor<C>>>,
    this_object: RefCell<Option<ObjectId>>,
    this_player: RefCell<Option<ObjectId>>,
    void_room: ObjectId,
}

impl<C: Clock> EfunBridge<C> {
    pub fn new(
        clock: C,
        registry: ObjectRegistry,
        permissions: Permissions,
        scheduler: Scheduler<C>,
        sessions: SessionManager<C>,
        vfs: Vfs,
    ) -> Self {
        Self {
            clock,
            registry,
            shadows: ShadowRegistry::new(),
            permissions,
            scheduler,
            sessions,
            vfs,
            connections: ConnectionTable::new(),
            reloader: HotReloader::new(),
            sink: Box::new(NullSink),
            executor: None,
            this_object: RefCell::new(None),
            this_player: RefCell::new(None),
            void_room: ObjectId::blueprint("/std/void"),
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn ConnectionSink>) {
        self.sink = sink;
    }

    /// Configure the fallback room evacuated occupants land in (§8 "Room
    /// deletion evacuation"). Defaults to the `/std/void` blueprint.
    pub fn set_void_room(&mut self, void_room: ObjectId) {
        self.void_room = void_room;
    }

    pub fn set_command_executor(&mut self, executor: Box<dyn CommandExecutor<C>>) {
        self.executor = Some(executor);
    }

    /// Set the entry-point context (§4.7) before invoking a verb body or
    /// command handler. Must be paired with [`Self::clear_context`].
    pub fn set_context(&self, this_object: ObjectId, this_player: Option<ObjectId>) {
        *self.this_object.borrow_mut() = Some(this_object);
        *self.this_player.borrow_mut() = this_player;
    }

    pub fn clear_context(&self) {
        *self.this_object.borrow_mut() = None;
        *self.this_player.borrow_mut() = None;
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    /// A copy of `object`'s current property bag, for persistence (§10.5
    /// "Graceful shutdown" flushing player saves).
    pub fn snapshot_properties(&self, object: &ObjectId) -> Option<PropertyBag> {
        self.handle(object).map(|h| h.lock().properties.clone())
    }

    pub fn registry_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.registry
    }

    // ---- Object -----------------------------------------------------

    pub fn clone_object(&mut self, path: &str) -> Result<ObjectId, EfunError> {
        let handle = self.registry.clone_object(path)?;
        let id = handle.lock().id.clone();
        Ok(id)
    }

    /// `true` if an object existed at `object` and was destroyed; `false`
    /// if it was already gone (destroy is idempotent, §3).
    pub fn destruct(&mut self, object: &ObjectId) -> bool {
        self.registry.destroy(object)
    }

    /// Look up an already-loaded blueprint. Compiling a blueprint from
    /// source is the hot-reloader's job ([`Self::reload_object`]); this
    /// efun only resolves what is already registered.
    pub fn load_object(&self, path: &str) -> Option<ObjectId> {
        self.registry.find_blueprint(path).map(|_| ObjectId::blueprint(path))
    }

    pub fn find_object(&self, path_or_id: &str) -> Option<ObjectId> {
        self.registry.find(path_or_id).map(|h| h.lock().id.clone())
    }

    pub fn all_inventory(&self, object: &ObjectId) -> Vec<ObjectId> {
        self.handle(object).map(|h| h.lock().inventory.clone()).unwrap_or_default()
    }

    pub fn environment(&self, object: &ObjectId) -> Option<ObjectId> {
        self.handle(object).and_then(|h| h.lock().environment.clone())
    }

    /// Move `object` into `destination`, or out of the world when `None`.
    pub fn move_object(&mut self, object: &ObjectId, destination: Option<&ObjectId>) -> Result<(), EfunError> {
        self.registry.move_object(object, destination).map_err(EfunError::from)
    }

    fn handle(&self, object: &ObjectId) -> Option<ObjectHandle> {
        self.registry.find_by_id(object)
    }

    /// `true` if `object`'s compiled class exposes `method` (§4.8, for
    /// on-object action resolution).
    pub fn has_method(&self, object: &ObjectId, method: &str) -> bool {
        self.registry
            .find_blueprint(object.blueprint_path())
            .is_some_and(|record| record.class_handle().has_method(method))
    }

    /// `object`'s registered actions for `verb`, already priority-ordered
    /// (§4.8 step 3's tie-break rule lives in [`mf_core::ActionTable`]).
    pub fn action_candidates(&self, object: &ObjectId, verb: &str) -> Vec<ActionEntry> {
        self.handle(object).map(|h| h.lock().actions.candidates(verb).to_vec()).unwrap_or_default()
    }

    /// Register an on-object action handler. Returns `false` if `object`
    /// does not exist.
    pub fn add_action(&mut self, object: &ObjectId, entry: ActionEntry) -> bool {
        match self.handle(object) {
            Some(handle) => {
                handle.lock().actions.add(entry);
                true
            }
            None => false,
        }
    }

    /// Invoke a compiled method on `object` with the efun context set to
    /// `(object, this_player)` for the call's duration (§4.8 step 4). Used
    /// for on-object action handlers; global `/cmds/...` modules are not
    /// registered objects and are invoked directly by the dispatcher.
    pub fn invoke_verb(
        &mut self,
        object: &ObjectId,
        this_player: Option<ObjectId>,
        method: &str,
        args: &[PropertyValue],
    ) -> Result<PropertyValue, EfunError> {
        let handle = self
            .handle(object)
            .ok_or_else(|| EfunError::Other(format!("no such object: {object}")))?;
        let class = self
            .registry
            .find_blueprint(object.blueprint_path())
            .map(|record| record.class_handle())
            .ok_or_else(|| EfunError::Other(format!("no compiled class for {object}")))?;
        self.set_context(object.clone(), this_player);
        let outcome = {
            let mut guard = handle.lock();
            class.call_method(method, args, &mut guard.properties, self)
        };
        self.clear_context();
        outcome.map_err(EfunError::Other)
    }

    // ---- Player / context --------------------------------------------

    pub fn all_players(&self) -> Vec<ObjectId> {
        self.connections.all_active_players()
    }

    // ---- Files ---------------------------------------------------------

    pub async fn read_file(&self, path: &str) -> Result<String, EfunError> {
        self.vfs.read_to_string(path).await.map_err(EfunError::from)
    }

    pub async fn write_file(&self, path: &str, contents: &str) -> Result<(), EfunError> {
        self.vfs.write(path, contents.as_bytes()).await.map_err(EfunError::from)
    }

    pub async fn file_exists(&self, path: &str) -> Result<bool, EfunError> {
        self.vfs.exists(path).await.map_err(EfunError::from)
    }

    pub async fn read_dir(&self, path: &str) -> Result<Vec<String>, EfunError> {
        let entries = self.vfs.read_dir(path).await?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }

    pub async fn file_stat(&self, path: &str) -> Result<mf_vfs::Stat, EfunError> {
        self.vfs.stat(path).await.map_err(EfunError::from)
    }

    pub async fn make_dir(&self, path: &str, recursive: bool) -> Result<(), EfunError> {
        self.vfs.make_dir(path, recursive).await.map_err(EfunError::from)
    }

    pub async fn remove_dir(&self, path: &str, recursive: bool) -> Result<(), EfunError> {
        self.vfs.remove_dir(path, recursive).await.map_err(EfunError::from)
    }

    pub async fn remove_file(&self, path: &str) -> Result<(), EfunError> {
        self.vfs.remove_file(path).await.map_err(EfunError::from)
    }

    pub async fn move_file(&self, from: &str, to: &str) -> Result<(), EfunError> {
        self.vfs.move_path(from, to).await.map_err(EfunError::from)
    }

    pub async fn copy_file_to(&self, from: &str, to: &str) -> Result<u64, EfunError> {
        self.vfs.copy_path(from, to).await.map_err(EfunError::from)
    }

    // ---- Utility ---------------------------------------------------------
    // Stateless; exposed directly from `crate::utility` rather than
    // re-wrapped here.

    pub fn capitalize(&self, s: &str) -> String {
        utility::capitalize(s)
    }

    pub fn random(&self, low: i64, high: i64) -> i64 {
        utility::random(low, high)
    }

    pub fn sprintf(&self, format: &str, args: &[String]) -> String {
        utility::sprintf(format, args)
    }

    pub fn time(&self) -> u64 {
        utility::to_seconds(self.clock.epoch_ms())
    }

    pub fn time_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    pub fn format_duration(&self, ms: u64) -> String {
        utility::format_duration(ms)
    }

    pub fn format_date(&self, epoch_ms: u64) -> String {
        utility::format_date(epoch_ms)
    }

    // ---- Permissions -------------------------------------------------

    pub fn check_read_permission(&self, name: &str, path: &str) -> bool {
        self.permissions.check_read(name, path)
    }

    pub fn check_write_permission(&self, name: &str, path: &str) -> bool {
        self.permissions.check_write(name, path)
    }

    pub fn is_admin(&self, name: &str) -> bool {
        self.permissions.is_admin(name)
    }

    pub fn is_builder(&self, name: &str) -> bool {
        self.permissions.is_builder(name)
    }

    pub fn get_permission_level(&self, name: &str) -> PermissionLevel {
        self.permissions.level_of(name)
    }

    pub fn set_permission_level(&mut self, caller: Option<&str>, name: &str, level: u8) -> AdminResult {
        self.permissions.set_level(caller, name, level).into()
    }

    pub fn add_builder_path(&mut self, caller: &str, prefix: &str) -> AdminResult {
        self.admin_mutate(caller, |p| p.add_builder_path(prefix))
    }

    pub fn add_senior_path(&mut self, caller: &str, prefix: &str) -> AdminResult {
        self.admin_mutate(caller, |p| p.add_senior_path(prefix))
    }

    pub fn add_protected_path(&mut self, caller: &str, prefix: &str) -> AdminResult {
        self.admin_mutate(caller, |p| p.add_protected_path(prefix))
    }

    pub fn add_forbidden_file(&mut self, caller: &str, path: &str) -> AdminResult {
        self.admin_mutate(caller, |p| p.add_forbidden_file(path))
    }

    fn admin_mutate(&mut self, caller: &str, f: impl FnOnce(&mut Permissions)) -> AdminResult {
        if !self.permissions.is_admin(caller) {
            return AdminResult::failure("permission denied");
        }
        f(&mut self.permissions);
        AdminResult::ok()
    }

    // ---- Scheduler -----------------------------------------------------

    pub fn set_heartbeat(&mut self, object: ObjectId, enable: bool) {
        self.scheduler.set_heartbeat(object, enable);
    }

    pub fn call_out_efun(&mut self, object: ObjectId, method: String, args: Vec<PropertyValue>, delay_ms: u64) -> CalloutId {
        self.scheduler.call_out(CalloutJob { object, method, args }, delay_ms)
    }

    pub fn remove_call_out(&mut self, id: CalloutId) -> bool {
        self.scheduler.remove_call_out(id)
    }

    pub fn pending_callout_count(&self) -> usize {
        self.scheduler.pending_callout_count()
    }

    pub fn heartbeat_count(&self) -> usize {
        self.scheduler.heartbeat_count()
    }

    /// Drive one tick: dispatch every due heartbeat's `heartbeat()` method
    /// through the registry, disabling any that raises (§4.6, §5 "never
    /// re-entrant"). Called by the world-owning task, never by content.
    pub fn run_due_heartbeats(&mut self) {
        for object in self.scheduler.due_heartbeats() {
            if !self.has_method(&object, "heartbeat") {
                self.scheduler.heartbeat_finished(&object);
                continue;
            }
            match self.invoke_verb(&object, None, "heartbeat", &[]) {
                Ok(_) => self.scheduler.heartbeat_finished(&object),
                Err(error) => self.scheduler.heartbeat_failed(&object, &error.to_string()),
            }
        }
    }

    /// Drive one tick: dispatch every due callout through the registry
    /// (§5 "Callout firing order").
    pub fn run_due_callouts(&mut self) {
        for (id, job) in self.scheduler.due_callouts() {
            debug!(%id, object = %job.object, method = %job.method, "callout firing");
            if let Err(error) = self.invoke_verb(&job.object, None, &job.method, &job.args) {
                warn!(%id, object = %job.object, method = %job.method, %error, "callout handler failed");
            }
        }
    }

    // ---- Connection ------------------------------------------------------

    pub fn bind_player_to_connection(&mut self, player: &str, connection: ConnectionId) {
        self.connections.bind(player, connection);
    }

    pub fn find_connected_player(&self, connection: ConnectionId) -> Option<String> {
        self.connections.find_player(connection)
    }

    /// Transfer `player`'s binding to `new_connection`, closing the old one
    /// (§4.11). The caller is responsible for moving any input-handler
    /// stack; this only updates the binding table.
    pub fn transfer_connection(&mut self, player: &str, new_connection: ConnectionId) {
        if let Some(old) = self.connections.transfer(player, new_connection) {
            self.sink.close(old);
        }
    }

    pub fn find_active_player(&self, name: &str) -> Option<ObjectId> {
        self.connections.find_active_player(name)
    }

    pub fn register_active_player(&mut self, name: &str, object: ObjectId) {
        self.connections.register_active_player(name, object);
    }

    pub fn unregister_active_player(&mut self, name: &str) {
        self.connections.unregister_active_player(name);
    }

    /// Reverse lookup of [`Self::register_active_player`], used by the
    /// dispatcher to resolve a player's name (permission and handler-stack
    /// lookups are name-keyed, §4.8) from the `ObjectId` a verb call carries.
    pub fn player_name_of(&self, object: &ObjectId) -> Option<String> {
        self.connections.player_name_of(object).map(str::to_string)
    }

    pub fn execute_command(&mut self, player: &ObjectId, line: &str) -> Result<bool, EfunError> {
        let Some(mut executor) = self.executor.take() else {
            return Err(EfunError::Other("no command executor wired".to_string()));
        };
        let handled = executor.execute(self, player, line);
        self.executor = Some(executor);
        Ok(handled)
    }

    /// Issue a reconnect token for `player` (§4.10), binding it to the same
    /// connection already tracked in [`ConnectionTable`].
    pub fn issue_session(&self, player: &str, connection: ConnectionId, address: &str) -> String {
        self.sessions.create_token(player, connection, address).token
    }

    pub fn validate_session(&self, token: &str, remote_addr: Option<&str>) -> Result<String, EfunError> {
        self.sessions.validate(token, remote_addr).map(|record| record.name).map_err(EfunError::from)
    }

    pub fn invalidate_session(&self, connection: ConnectionId) {
        self.sessions.invalidate(connection);
    }

    pub fn invalidate_player_sessions(&self, player: &str) {
        self.sessions.invalidate_player(player);
    }

    /// Purge expired sessions, returning the number removed (§10.5 status
    /// snapshot, periodic sweep on the world loop).
    pub fn sweep_sessions(&self) -> usize {
        self.sessions.sweep()
    }

    pub fn active_session_count(&self) -> usize {
        self.sessions.active_count()
    }

    // ---- Persistence -------------------------------------------------

    pub async fn save_player(&self, name: &str, data: &PropertyBag) -> Result<(), EfunError> {
        let body = serde_json::to_vec_pretty(data).map_err(|e| EfunError::Other(e.to_string()))?;
        self.vfs.write(&player_data_path(name), &body).await.map_err(EfunError::from)
    }

    pub async fn load_player_data(&self, name: &str) -> Result<PropertyBag, EfunError> {
        let text = self.vfs.read_to_string(&player_data_path(name)).await?;
        serde_json::from_str(&text).map_err(|e| EfunError::Other(e.to_string()))
    }

    pub async fn player_exists(&self, name: &str) -> Result<bool, EfunError> {
        self.vfs.exists(&player_data_path(name)).await.map_err(EfunError::from)
    }

    pub async fn list_players(&self) -> Result<Vec<String>, EfunError> {
        let entries = self.vfs.read_dir(PLAYERS_DIR).await?;
        Ok(entries
            .into_iter()
            .filter(|e| !e.is_dir && e.name.ends_with(".json"))
            .map(|e| e.name.trim_end_matches(".json").to_string())
            .collect())
    }

    // ---- Hot reload ----------------------------------------------------

    pub fn reload_object(&mut self, path: &str) -> Vec<(String, Result<UpdateOutcome, CompileError>)> {
        let mut reloader = std::mem::take(&mut self.reloader);
        let results = reloader.update_with_dependents(self, path);
        self.reloader = reloader;
        results
    }

    pub fn reload_command(&mut self, path: &str) -> Result<UpdateOutcome, CompileError> {
        let mut reloader = std::mem::take(&mut self.reloader);
        let result = reloader.update(self, path);
        self.reloader = reloader;
        result
    }

    /// Handle a deleted source file (§4.5 "deletion"): evacuates any
    /// occupants of a populated room blueprint before unregistering it.
    pub fn handle_file_deletion(&mut self, path: &str) {
        let mut reloader = std::mem::take(&mut self.reloader);
        reloader.handle_deletion(self, path);
        self.reloader = reloader;
    }

    /// Command-table reindexing lives in `mf-dispatch`, which owns the
    /// `/cmds/...` table this bridge has no visibility into; recorded here
    /// only as the efun entry point content calls.
    pub fn rehash_commands(&mut self) {
        debug!("rehash_commands requested; no-op at the efun bridge");
    }

    // ---- Shadows -------------------------------------------------------

    pub fn add_shadow(&mut self, target: &ObjectId, priority: i32, behavior: Arc<dyn ShadowBehavior>) -> Result<ShadowId, EfunError> {
        let id = ShadowId::new();
        self.shadows.add_shadow(target, id, priority, behavior)?;
        Ok(id)
    }

    pub fn remove_shadow(&mut self, target: &ObjectId, id: ShadowId) -> Result<(), EfunError> {
        self.shadows.remove_shadow(target, id).map_err(EfunError::from)
    }

    pub fn clear_shadows(&mut self, target: &ObjectId) {
        self.shadows.clear_shadows(target);
    }

    pub fn has_shadows(&self, target: &ObjectId) -> bool {
        self.shadows.has_shadows(target)
    }

    pub fn get_shadows(&self, target: &ObjectId) -> usize {
        self.shadows.shadow_count(target)
    }

    pub fn find_shadow(&self, target: &ObjectId, shadow_type: &str) -> Option<Arc<dyn ShadowBehavior>> {
        self.shadows.find_shadow(target, shadow_type)
    }

    pub fn get_shadow_stats(&self) -> (usize, usize) {
        self.shadows.stats()
    }

    /// There is no proxy wrapper in this design (§9 "Dynamic dispatch
    /// through shadows" resolves through explicit lookup functions
    /// instead), so wrapping an object for shadowed access is the identity.
    pub fn get_original_object(&self, object: &ObjectId) -> ObjectId {
        object.clone()
    }

    pub fn wrap_shadowed_object(&self, object: &ObjectId) -> ObjectId {
        object.clone()
    }

    pub fn wrap_shadowed_objects(&self, objects: &[ObjectId]) -> Vec<ObjectId> {
        objects.to_vec()
    }
}

impl<C: Clock> ScriptContext for EfunBridge<C> {
    fn this_object(&self) -> ObjectId {
        self.this_object
            .borrow()
            .clone()
            .unwrap_or_else(|| ObjectId::blueprint("/std/void"))
    }

    fn this_player(&self) -> Option<ObjectId> {
        self.this_player.borrow().clone()
    }

    fn send(&mut self, target: &ObjectId, message: &str) {
        let Some(player_name) = self.connections.player_name_of(target).map(str::to_string) else {
            debug!(%target, "send target has no bound connection");
            return;
        };
        let Some(connection) = self.connections.find_connection(&player_name) else {
            debug!(%target, "send target has no active connection");
            return;
        };
        self.sink.send_frame(connection, "terminal", serde_json::json!({ "text": message }));
    }

    fn move_object(&mut self, object: &ObjectId, destination: &ObjectId) -> Result<(), String> {
        self.registry.move_object(object, Some(destination)).map_err(|e| e.to_string())
    }

    fn call_out(&mut self, object: ObjectId, method: String, args: Vec<PropertyValue>, delay_ms: u64) {
        self.scheduler.call_out(CalloutJob { object, method, args }, delay_ms);
    }
}

impl<C: Clock> ReloadHost for EfunBridge<C> {
    fn read_source(&self, path: &str) -> std::io::Result<String> {
        let resolved = self
            .vfs
            .resolve(path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
        std::fs::read_to_string(resolved)
    }

    fn register(&mut self, path: &str, module: mf_script::CompiledModule) -> usize {
        self.registry.register_blueprint(path, Arc::new(module));
        self.registry.clone_ids_of(path).len()
    }

    fn is_safelisted(&self, path: &str) -> bool {
        self.registry.find_blueprint(path).is_some_and(|b| b.is_safelisted())
    }

    fn is_room(&self, path: &str) -> bool {
        self.registry.find_blueprint(path).is_some_and(|b| b.is_room())
    }

    fn room_occupants(&self, path: &str) -> Vec<ObjectId> {
        self.registry.find(path).map(|h| h.lock().inventory.clone()).unwrap_or_default()
    }

    fn notify_occupant(&mut self, occupant: &ObjectId, message: &str) {
        self.send(occupant, message);
    }

    fn evacuate(&mut self, occupant: &ObjectId) {
        let void_room = self.void_room.clone();
        if let Err(error) = self.registry.move_object(occupant, Some(&void_room)) {
            warn!(%occupant, %error, "failed to evacuate occupant to void room");
        }
    }

    fn unregister(&mut self, path: &str) {
        self.registry.unregister_blueprint(path);
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
