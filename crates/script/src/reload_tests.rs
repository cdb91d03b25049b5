// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::{HashMap, HashSet};
use std::io;

use super::*;

#[derive(Default)]
struct FakeHost {
    sources: HashMap<String, String>,
    clone_counts: HashMap<String, usize>,
    safelisted: HashSet<String>,
    rooms: HashMap<String, Vec<ObjectId>>,
    notified: Vec<(ObjectId, String)>,
    evacuated: Vec<ObjectId>,
    unregistered: Vec<String>,
    registered_paths: Vec<String>,
}

impl ReloadHost for FakeHost {
    fn read_source(&self, path: &str) -> io::Result<String> {
        self.sources.get(path).cloned().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path))
    }
    fn register(&mut self, path: &str, _module: CompiledModule) -> usize {
        self.registered_paths.push(path.to_string());
        *self.clone_counts.get(path).unwrap_or(&0)
    }
    fn is_safelisted(&self, path: &str) -> bool {
        self.safelisted.contains(path)
    }
    fn is_room(&self, path: &str) -> bool {
        self.rooms.contains_key(path)
    }
    fn room_occupants(&self, path: &str) -> Vec<ObjectId> {
        self.rooms.get(path).cloned().unwrap_or_default()
    }
    fn notify_occupant(&mut self, occupant: &ObjectId, message: &str) {
        self.notified.push((occupant.clone(), message.to_string()));
    }
    fn evacuate(&mut self, occupant: &ObjectId) {
        self.evacuated.push(occupant.clone());
    }
    fn unregister(&mut self, path: &str) {
        self.unregistered.push(path.to_string());
    }
}

const OBJ: &str = r#"object "/std/counter" { properties { count: 0 } verb tick() { set count = count + 1 } }"#;

#[test]
fn explicit_update_reports_refreshed_clone_count() {
    let mut host = FakeHost::default();
    host.sources.insert("/std/counter".into(), OBJ.to_string());
    host.clone_counts.insert("/std/counter".into(), 3);

    let mut reloader = HotReloader::new();
    let outcome = reloader.update(&mut host, "/std/counter").unwrap();
    assert_eq!(outcome.clones_refreshed, 3);
    assert_eq!(host.registered_paths, vec!["/std/counter".to_string()]);
}

#[test]
fn failed_compile_never_registers() {
    let mut host = FakeHost::default();
    host.sources.insert("/broken".into(), "object \"/broken\" { not valid".to_string());

    let mut reloader = HotReloader::new();
    assert!(reloader.update(&mut host, "/broken").is_err());
    assert!(host.registered_paths.is_empty());
}

#[test]
fn update_with_dependents_walks_breadth_first() {
    let mut host = FakeHost::default();
    host.sources.insert("/std/base".into(), r#"object "/std/base" { }"#.to_string());
    host.sources.insert("/std/child".into(), r#"object "/std/child" { depends on "/std/base" }"#.to_string());
    host.sources.insert("/std/grandchild".into(), r#"object "/std/grandchild" { depends on "/std/child" }"#.to_string());

    let mut reloader = HotReloader::new();
    // Establish the dependency edges first, as a prior reload pass would.
    reloader.update(&mut host, "/std/child").unwrap();
    reloader.update(&mut host, "/std/grandchild").unwrap();
    host.registered_paths.clear();

    let results = reloader.update_with_dependents(&mut host, "/std/base");
    let paths: Vec<_> = results.iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(paths, vec!["/std/base", "/std/child", "/std/grandchild"]);
    assert!(results.iter().all(|(_, r)| r.is_ok()));
}

#[test]
fn dependent_failure_does_not_block_sibling_branches() {
    let mut host = FakeHost::default();
    host.sources.insert("/std/base".into(), r#"object "/std/base" { }"#.to_string());
    host.sources.insert("/std/a".into(), r#"object "/std/a" { depends on "/std/base" }"#.to_string());
    host.sources.insert("/std/b".into(), r#"object "/std/b" { depends on "/std/base" }"#.to_string());

    let mut reloader = HotReloader::new();
    reloader.update(&mut host, "/std/a").unwrap();
    reloader.update(&mut host, "/std/b").unwrap();
    // Now break /std/a's source so the BFS branch through it fails, while
    // /std/b's sibling branch still runs since both are direct dependents.
    host.sources.insert("/std/a".into(), "object \"/std/a\" { broken".to_string());

    let results = reloader.update_with_dependents(&mut host, "/std/base");
    let by_path: HashMap<_, _> = results.into_iter().collect();
    assert!(by_path["/std/base"].is_ok());
    assert!(by_path["/std/a"].is_err());
    assert!(by_path["/std/b"].is_ok());
}

#[test]
fn deletion_of_safelisted_blueprint_is_a_no_op() {
    let mut host = FakeHost::default();
    host.safelisted.insert("/std/base".into());
    let mut reloader = HotReloader::new();
    reloader.handle_deletion(&mut host, "/std/base");
    assert!(host.unregistered.is_empty());
}

#[test]
fn deletion_of_populated_room_evacuates_then_unregisters() {
    let mut host = FakeHost::default();
    let alice = ObjectId::from("/std/player#1");
    host.rooms.insert("/areas/plaza".into(), vec![alice.clone()]);

    let mut reloader = HotReloader::new();
    reloader.handle_deletion(&mut host, "/areas/plaza");

    assert_eq!(host.notified.len(), 1);
    assert_eq!(host.notified[0].0, alice);
    assert_eq!(host.evacuated, vec![alice]);
    assert_eq!(host.unregistered, vec!["/areas/plaza".to_string()]);
}

#[test]
fn deletion_of_non_room_just_unregisters() {
    let mut host = FakeHost::default();
    host.sources.insert("/std/counter".into(), OBJ.to_string());
    let mut reloader = HotReloader::new();
    reloader.handle_deletion(&mut host, "/std/counter");
    assert!(host.evacuated.is_empty());
    assert_eq!(host.unregistered, vec!["/std/counter".to_string()]);
}

#[test]
fn skipped_directories_are_recognised() {
    assert!(is_skipped(std::path::Path::new("/mudlib/cmds/player/look.obj")));
    assert!(is_skipped(std::path::Path::new("/mudlib/config/game.json")));
    assert!(is_skipped(std::path::Path::new("/mudlib/data/players/alice.json")));
    assert!(!is_skipped(std::path::Path::new("/mudlib/std/counter.obj")));
    assert!(!is_skipped(std::path::Path::new("/mudlib/areas/plaza/room.obj")));
}
