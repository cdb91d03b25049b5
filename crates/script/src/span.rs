// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source location tracking for the object-definition compiler.

use serde::{Deserialize, Serialize};

/// A byte-offset range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    #[inline]
    pub fn empty(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span { start: self.start.min(other.start), end: self.end.max(other.end) }
    }

    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// Locate a span in source, returning (line_number, column, line_content).
/// Line numbers are 1-indexed; column is 0-indexed from line start.
pub fn locate_span(source: &str, span: Span) -> (usize, usize, &str) {
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, ch) in source.char_indices() {
        if i >= span.start {
            break;
        }
        if ch == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..].find('\n').map(|i| line_start + i).unwrap_or(source.len());
    let effective_start = span.start.min(source.len());
    let col = if effective_start >= line_start {
        source[line_start..effective_start].chars().count()
    } else {
        0
    };

    (line_num, col, &source[line_start..line_end])
}

/// A rustc-style diagnostic with line/column info.
pub fn diagnostic_context(source: &str, span: Span, message: &str) -> String {
    let (line_num, col, line_content) = locate_span(source, span);
    let span_len = (span.end - span.start).max(1);

    format!(
        "error: {}\n  --> line {}, column {}\n   |\n{:>3} | {}\n   | {}{}",
        message,
        line_num,
        col + 1,
        line_num,
        line_content,
        " ".repeat(col),
        "^".repeat(span_len)
    )
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
