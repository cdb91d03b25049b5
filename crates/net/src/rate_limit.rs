// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-IP rolling-window handshake rate limiting (§4.11, §8
//! "Rate-limit monotonicity"). Generic over [`Clock`] so the one-minute
//! window can be driven deterministically in tests with `FakeClock`.

use std::collections::HashMap;
use std::net::IpAddr;

use mf_core::Clock;
use parking_lot::Mutex;
use tracing::warn;

const WINDOW_MS: u64 = 60_000;

struct Window {
    started_at_ms: u64,
    count: u32,
}

/// A token-bucket-per-minute limiter on handshake attempts, keyed by
/// remote IP.
pub struct HandshakeLimiter<C: Clock> {
    clock: C,
    cap: u32,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl<C: Clock> HandshakeLimiter<C> {
    pub fn new(clock: C, per_minute_cap: u32) -> Self {
        Self { clock, cap: per_minute_cap, windows: Mutex::new(HashMap::new()) }
    }

    /// Record one handshake attempt from `addr`. Returns `false` once the
    /// current minute's cap is exhausted.
    pub fn check(&self, addr: IpAddr) -> bool {
        let now = self.clock.epoch_ms();
        let mut windows = self.windows.lock();
        let window = windows.entry(addr).or_insert(Window { started_at_ms: now, count: 0 });
        if now.saturating_sub(window.started_at_ms) >= WINDOW_MS {
            window.started_at_ms = now;
            window.count = 0;
        }
        if window.count >= self.cap {
            warn!(%addr, "handshake rate limit exceeded");
            return false;
        }
        window.count += 1;
        true
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
