// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiler error types.

use thiserror::Error;

use crate::span::{diagnostic_context, Span};
use crate::token::TokenKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexerError {
    #[error("unexpected character '{found}' at position {}", span.start)]
    UnexpectedChar { found: char, span: Span },

    #[error("unterminated string literal at position {}", span.start)]
    UnterminatedString { span: Span },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnexpectedChar { span, .. } => *span,
            LexerError::UnterminatedString { span } => *span,
        }
    }
}

/// Errors raised while parsing or compiling an object definition.
///
/// Use [`CompileError::diagnostic`] for a human-readable snippet showing
/// where the error occurred.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("unexpected token {found} at position {}, expected {expected}", span.start)]
    UnexpectedToken { found: TokenKind, expected: String, span: Span },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("unknown identifier '{name}' at position {}", span.start)]
    UnknownIdent { name: String, span: Span },

    #[error("duplicate verb '{name}'")]
    DuplicateVerb { name: String },

    #[error("division by zero evaluating verb '{verb}'")]
    DivisionByZero { verb: String },

    #[error("type error in verb '{verb}': {message}")]
    TypeError { verb: String, message: String },

    #[error("no such verb '{name}' on this object")]
    NoSuchVerb { name: String },
}

impl CompileError {
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Lexer(e) => Some(e.span()),
            CompileError::UnexpectedToken { span, .. } => Some(*span),
            CompileError::UnexpectedEof { .. } => None,
            CompileError::UnknownIdent { span, .. } => Some(*span),
            CompileError::DuplicateVerb { .. } => None,
            CompileError::DivisionByZero { .. } => None,
            CompileError::TypeError { .. } => None,
            CompileError::NoSuchVerb { .. } => None,
        }
    }

    /// A rustc-style diagnostic, if this error carries a source span.
    pub fn diagnostic(&self, source: &str) -> Option<String> {
        Some(diagnostic_context(source, self.span()?, &self.to_string()))
    }
}
