// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_both_instant_and_epoch() {
    let clock = FakeClock::new();
    let t0 = clock.now();
    let e0 = clock.epoch_ms();
    clock.advance(Duration::from_millis(500));
    assert_eq!(clock.now(), t0 + Duration::from_millis(500));
    assert_eq!(clock.epoch_ms(), e0 + 500);
}

#[test]
fn system_clock_epoch_ms_is_plausible() {
    let clock = SystemClock;
    // Anything after 2020-01-01 in epoch millis.
    assert!(clock.epoch_ms() > 1_577_836_800_000);
}
