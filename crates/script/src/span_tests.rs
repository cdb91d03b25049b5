// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn locate_span_finds_line_and_column() {
    let source = "verb tick() {\n    set count = bad\n}\n";
    let bad_pos = source.find("bad").unwrap();
    let span = Span::new(bad_pos, bad_pos + 3);
    let (line, col, content) = locate_span(source, span);
    assert_eq!(line, 2);
    assert_eq!(content, "    set count = bad");
    assert_eq!(&content[col..col + 3], "bad");
}

#[test]
fn merge_covers_both_spans() {
    let a = Span::new(2, 5);
    let b = Span::new(10, 12);
    let merged = a.merge(b);
    assert_eq!(merged, Span::new(2, 12));
}

#[test]
fn diagnostic_context_includes_caret() {
    let source = "set x = 1";
    let span = Span::new(4, 5);
    let msg = diagnostic_context(source, span, "bad identifier");
    assert!(msg.contains("bad identifier"));
    assert!(msg.contains("^"));
}
