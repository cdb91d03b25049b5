// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer for the object-definition language (§4.3 "Compiler realization").

use crate::error::LexerError;
use crate::span::Span;
use crate::token::{keyword, Token, TokenKind};

pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, chars: input.char_indices().peekable() }
    }

    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::with_capacity(input.len() / 4 + 1);
        loop {
            let token = lexer.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    #[inline]
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('#') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_trivia();

        let Some(&(pos, ch)) = self.chars.peek() else {
            let end = self.input.len();
            return Ok(Token::new(TokenKind::Eof, Span::new(end, end)));
        };

        match ch {
            '{' => self.single(pos, TokenKind::LBrace),
            '}' => self.single(pos, TokenKind::RBrace),
            '(' => self.single(pos, TokenKind::LParen),
            ')' => self.single(pos, TokenKind::RParen),
            ':' => self.single(pos, TokenKind::Colon),
            ',' => self.single(pos, TokenKind::Comma),
            '+' => self.single(pos, TokenKind::Plus),
            '-' => self.single(pos, TokenKind::Minus),
            '*' => self.single(pos, TokenKind::Star),
            '/' => self.single(pos, TokenKind::Slash),
            '"' => self.lex_string(pos),
            '=' => self.lex_two_char(pos, '=', TokenKind::EqEq, TokenKind::Eq),
            '!' => self.lex_two_char_required(pos, '=', TokenKind::NotEq, '!'),
            '<' => self.lex_two_char(pos, '=', TokenKind::LtEq, TokenKind::Lt),
            '>' => self.lex_two_char(pos, '=', TokenKind::GtEq, TokenKind::Gt),
            '&' => self.lex_two_char_required(pos, '&', TokenKind::AndAnd, '&'),
            '|' => self.lex_two_char_required(pos, '|', TokenKind::OrOr, '|'),
            c if c.is_ascii_digit() => Ok(self.lex_number(pos)),
            c if c.is_alphabetic() || c == '_' => Ok(self.lex_ident(pos)),
            other => {
                self.chars.next();
                Err(LexerError::UnexpectedChar { found: other, span: Span::new(pos, pos + other.len_utf8()) })
            }
        }
    }

    fn single(&mut self, pos: usize, kind: TokenKind) -> Result<Token, LexerError> {
        self.chars.next();
        Ok(Token::new(kind, Span::new(pos, pos + 1)))
    }

    fn lex_two_char(&mut self, pos: usize, second: char, two: TokenKind, one: TokenKind) -> Result<Token, LexerError> {
        self.chars.next();
        if self.peek_char() == Some(second) {
            self.chars.next();
            Ok(Token::new(two, Span::new(pos, pos + 2)))
        } else {
            Ok(Token::new(one, Span::new(pos, pos + 1)))
        }
    }

    fn lex_two_char_required(
        &mut self,
        pos: usize,
        second: char,
        kind: TokenKind,
        first: char,
    ) -> Result<Token, LexerError> {
        self.chars.next();
        if self.peek_char() == Some(second) {
            self.chars.next();
            Ok(Token::new(kind, Span::new(pos, pos + 2)))
        } else {
            Err(LexerError::UnexpectedChar { found: first, span: Span::new(pos, pos + 1) })
        }
    }

    fn lex_string(&mut self, start: usize) -> Result<Token, LexerError> {
        self.chars.next(); // opening quote
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => {
                    let end = self.chars.peek().map(|(p, _)| *p).unwrap_or(self.input.len());
                    return Ok(Token::new(TokenKind::Str(s), Span::new(start, end)));
                }
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => s.push('\n'),
                    Some((_, 't')) => s.push('\t'),
                    Some((_, '"')) => s.push('"'),
                    Some((_, '\\')) => s.push('\\'),
                    Some((_, c)) => s.push(c),
                    None => return Err(LexerError::UnterminatedString { span: Span::new(start, self.input.len()) }),
                },
                Some((_, c)) => s.push(c),
                None => return Err(LexerError::UnterminatedString { span: Span::new(start, self.input.len()) }),
            }
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                end = pos + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.input[start..end];
        let value: f64 = text.parse().unwrap_or(0.0);
        Token::new(TokenKind::Number(value), Span::new(start, end))
    }

    fn lex_ident(&mut self, start: usize) -> Token {
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                end = pos + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let word = &self.input[start..end];
        let kind = keyword(word).unwrap_or_else(|| TokenKind::Ident(word.to_string()));
        Token::new(kind, Span::new(start, end))
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
