// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mf_core::FakeClock;

fn job(name: &str) -> CalloutJob {
    CalloutJob { object: ObjectId::from(name), method: "fire".into(), args: vec![] }
}

#[test]
fn heartbeat_ring_is_round_robin() {
    let mut sched = Scheduler::new(FakeClock::new());
    sched.set_heartbeat(ObjectId::from("/a#1"), true);
    sched.set_heartbeat(ObjectId::from("/b#1"), true);
    sched.set_heartbeat(ObjectId::from("/c#1"), true);
    let due = sched.due_heartbeats();
    assert_eq!(due, vec![ObjectId::from("/a#1"), ObjectId::from("/b#1"), ObjectId::from("/c#1")]);
}

#[test]
fn heartbeat_not_reentrant_across_ticks() {
    let mut sched = Scheduler::new(FakeClock::new());
    let a = ObjectId::from("/a#1");
    sched.set_heartbeat(a.clone(), true);
    let first = sched.due_heartbeats();
    assert_eq!(first, vec![a.clone()]);
    // Tick N+1 fires before N's heartbeat finished: it's skipped.
    let second = sched.due_heartbeats();
    assert!(second.is_empty());
    sched.heartbeat_finished(&a);
    let third = sched.due_heartbeats();
    assert_eq!(third, vec![a]);
}

#[test]
fn callout_fires_not_earlier_than_requested() {
    let clock = FakeClock::new();
    let mut sched = Scheduler::new(clock.clone());
    sched.call_out(job("/a#1"), 100);
    assert!(sched.due_callouts().is_empty());
    clock.advance(std::time::Duration::from_millis(99));
    assert!(sched.due_callouts().is_empty());
    clock.advance(std::time::Duration::from_millis(1));
    assert_eq!(sched.due_callouts().len(), 1);
}

#[test]
fn callout_cancellation_is_safe_after_firing() {
    let clock = FakeClock::new();
    let mut sched = Scheduler::new(clock.clone());
    let id = sched.call_out(job("/a#1"), 10);
    clock.advance(std::time::Duration::from_millis(10));
    assert_eq!(sched.due_callouts().len(), 1);
    assert!(!sched.remove_call_out(id));
}

#[test]
fn cancel_before_firing_prevents_delivery() {
    let mut sched = Scheduler::new(FakeClock::new());
    let id = sched.call_out(job("/a#1"), 0);
    assert!(sched.remove_call_out(id));
    assert!(sched.due_callouts().is_empty());
}

#[test]
fn same_due_time_fires_in_scheduling_order() {
    let clock = FakeClock::new();
    let mut sched = Scheduler::new(clock.clone());
    sched.call_out(job("/first#1"), 50);
    sched.call_out(job("/second#1"), 50);
    clock.advance(std::time::Duration::from_millis(50));
    let due = sched.due_callouts();
    let objects: Vec<_> = due.into_iter().map(|(_, j)| j.object).collect();
    assert_eq!(objects, vec![ObjectId::from("/first#1"), ObjectId::from("/second#1")]);
}

#[test]
fn disabling_heartbeat_clears_running_flag() {
    let mut sched = Scheduler::new(FakeClock::new());
    let a = ObjectId::from("/a#1");
    sched.set_heartbeat(a.clone(), true);
    sched.due_heartbeats();
    sched.heartbeat_failed(&a, "boom");
    assert!(!sched.has_heartbeat(&a));
}
