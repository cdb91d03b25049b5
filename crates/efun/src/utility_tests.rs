// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn capitalize_first_letter_only() {
    assert_eq!(capitalize("hello world"), "Hello world");
    assert_eq!(capitalize(""), "");
}

#[test]
fn random_respects_bounds() {
    for _ in 0..50 {
        let n = random(5, 10);
        assert!((5..10).contains(&n));
    }
    assert_eq!(random(5, 5), 5);
    assert_eq!(random(10, 5), 10);
}

#[test]
fn sprintf_substitutes_placeholders() {
    assert_eq!(sprintf("hello %s, you are %d", &["alice".into(), "3".into()]), "hello alice, you are 3");
}

#[test]
fn sprintf_escapes_percent() {
    assert_eq!(sprintf("100%% done", &[]), "100% done");
}

#[test]
fn duration_formatting_omits_leading_zero_components() {
    assert_eq!(format_duration(5_000), "5s");
    assert_eq!(format_duration(65_000), "1m 5s");
    assert_eq!(format_duration(3_661_000), "1h 1m 1s");
}

#[test]
fn seconds_and_milliseconds_round_trip() {
    assert_eq!(to_seconds(to_milliseconds(42)), 42);
}
