// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn encode_merges_channel_into_an_object_payload() {
    let frame = OutboundFrame::new("terminal", json!({"text": "hello"}));
    let text = frame.encode().unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["channel"], "terminal");
    assert_eq!(value["text"], "hello");
}

#[test]
fn encode_wraps_a_non_object_payload() {
    let frame = OutboundFrame::new("time", json!(12345));
    let text = frame.encode().unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["channel"], "time");
    assert_eq!(value["value"], 12345);
}

#[test]
fn oversized_frames_are_rejected_before_any_send() {
    let big = "x".repeat(MAX_FRAME_BYTES + 1);
    let frame = OutboundFrame::new("terminal", json!({"text": big}));
    let err = frame.encode().unwrap_err();
    assert!(matches!(err, NetError::FrameTooLarge { .. }));
}

#[test]
fn parse_recognizes_input_frames() {
    let parsed = InboundFrame::parse(r#"{"channel":"input","line":"look"}"#).unwrap();
    match parsed {
        InboundFrame::Input { line } => assert_eq!(line, "look"),
        _ => panic!("expected Input"),
    }
}

#[test]
fn parse_recognizes_gui_frames() {
    let parsed = InboundFrame::parse(r#"{"channel":"gui","action":"submit"}"#).unwrap();
    assert!(matches!(parsed, InboundFrame::Gui { .. }));
}

#[test]
fn parse_rejects_unknown_channels() {
    let err = InboundFrame::parse(r#"{"channel":"bogus"}"#).unwrap_err();
    assert!(matches!(err, NetError::MalformedFrame(_)));
}
