// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use mf_core::FakeClock;

use super::*;

fn addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

#[test]
fn the_nth_plus_one_call_within_a_minute_is_refused() {
    let clock = FakeClock::new();
    let limiter = HandshakeLimiter::new(clock, 3);
    let addr = addr();
    assert!(limiter.check(addr));
    assert!(limiter.check(addr));
    assert!(limiter.check(addr));
    assert!(!limiter.check(addr));
}

#[test]
fn a_call_a_minute_later_succeeds() {
    let clock = FakeClock::new();
    let limiter = HandshakeLimiter::new(clock.clone(), 1);
    let addr = addr();
    assert!(limiter.check(addr));
    assert!(!limiter.check(addr));
    clock.advance(Duration::from_millis(60_000));
    assert!(limiter.check(addr));
}

#[test]
fn distinct_addresses_have_independent_windows() {
    let clock = FakeClock::new();
    let limiter = HandshakeLimiter::new(clock, 1);
    let a = addr();
    let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    assert!(limiter.check(a));
    assert!(!limiter.check(a));
    assert!(limiter.check(b));
}
