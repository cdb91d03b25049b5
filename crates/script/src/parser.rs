// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser for object definitions.

use crate::ast::{BinOp, Expr, ObjectDef, Stmt, VerbDef};
use crate::error::CompileError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn parse(source: &str) -> Result<ObjectDef, CompileError> {
        let tokens = Lexer::tokenize(source)?;
        let mut parser = Parser { tokens, pos: 0 };
        let def = parser.parse_object()?;
        parser.expect(TokenKind::Eof)?;
        Ok(def)
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_span(&self) -> crate::span::Span {
        self.tokens[self.pos].span
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, CompileError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            let found = self.peek().clone();
            let span = self.peek_span();
            Err(CompileError::UnexpectedToken { found, expected: kind.to_string(), span })
        }
    }

    fn expect_ident(&mut self) -> Result<String, CompileError> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            found => {
                let span = self.peek_span();
                Err(CompileError::UnexpectedToken { found, expected: "identifier".into(), span })
            }
        }
    }

    fn expect_str(&mut self) -> Result<String, CompileError> {
        match self.peek().clone() {
            TokenKind::Str(s) => {
                self.advance();
                Ok(s)
            }
            found => {
                let span = self.peek_span();
                Err(CompileError::UnexpectedToken { found, expected: "string literal".into(), span })
            }
        }
    }

    fn parse_object(&mut self) -> Result<ObjectDef, CompileError> {
        self.expect(TokenKind::Object)?;
        let path = self.expect_str()?;
        self.expect(TokenKind::LBrace)?;

        let mut depends_on = Vec::new();
        let mut properties = Vec::new();
        let mut verbs = Vec::new();

        while !self.check(&TokenKind::RBrace) {
            match self.peek() {
                TokenKind::Depends => {
                    self.advance();
                    self.expect(TokenKind::On)?;
                    depends_on.push(self.expect_str()?);
                }
                TokenKind::Properties => {
                    properties = self.parse_properties()?;
                }
                TokenKind::Verb => {
                    let verb = self.parse_verb()?;
                    if verbs.iter().any(|v: &VerbDef| v.name == verb.name) {
                        return Err(CompileError::DuplicateVerb { name: verb.name });
                    }
                    verbs.push(verb);
                }
                found => {
                    let span = self.peek_span();
                    return Err(CompileError::UnexpectedToken {
                        found: found.clone(),
                        expected: "'depends', 'properties', or 'verb'".into(),
                        span,
                    });
                }
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(ObjectDef { path, depends_on, properties, verbs })
    }

    fn parse_properties(&mut self) -> Result<Vec<(String, Expr)>, CompileError> {
        self.expect(TokenKind::Properties)?;
        self.expect(TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let name = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expr()?;
            props.push((name, value));
            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(props)
    }

    fn parse_verb(&mut self) -> Result<VerbDef, CompileError> {
        self.expect(TokenKind::Verb)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            params.push(self.expect_ident()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;
        let body = self.parse_block()?;
        self.expect(TokenKind::RBrace)?;
        Ok(VerbDef { name, params, body })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, CompileError> {
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, CompileError> {
        match self.peek().clone() {
            TokenKind::Set => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(TokenKind::Eq)?;
                let value = self.parse_expr()?;
                Ok(Stmt::Set { name, value })
            }
            TokenKind::Send => {
                self.advance();
                let target = self.parse_expr()?;
                self.expect(TokenKind::Comma)?;
                let message = self.parse_expr()?;
                Ok(Stmt::Send { target, message })
            }
            TokenKind::Move => {
                self.advance();
                let object = self.parse_expr()?;
                self.expect(TokenKind::Comma)?;
                let destination = self.parse_expr()?;
                Ok(Stmt::Move { object, destination })
            }
            TokenKind::Schedule => {
                self.advance();
                let method = self.expect_str()?;
                self.expect(TokenKind::LParen)?;
                let mut args = Vec::new();
                while !self.check(&TokenKind::RParen) {
                    args.push(self.parse_expr()?);
                    if self.check(&TokenKind::Comma) {
                        self.advance();
                    }
                }
                self.expect(TokenKind::RParen)?;
                self.expect(TokenKind::After)?;
                let delay_ms = self.parse_expr()?;
                Ok(Stmt::Schedule { method, args, delay_ms })
            }
            TokenKind::Return => {
                self.advance();
                if self.check(&TokenKind::RBrace) {
                    Ok(Stmt::Return(None))
                } else {
                    Ok(Stmt::Return(Some(self.parse_expr()?)))
                }
            }
            TokenKind::If => {
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(TokenKind::LBrace)?;
                let then_branch = self.parse_block()?;
                self.expect(TokenKind::RBrace)?;
                let else_branch = if self.check(&TokenKind::Else) {
                    self.advance();
                    self.expect(TokenKind::LBrace)?;
                    let body = self.parse_block()?;
                    self.expect(TokenKind::RBrace)?;
                    body
                } else {
                    Vec::new()
                };
                Ok(Stmt::If { cond, then_branch, else_branch })
            }
            _ => Ok(Stmt::Expr(self.parse_expr()?)),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, CompileError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_and()?;
        while self.check(&TokenKind::OrOr) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Binary { op: BinOp::Or, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_equality()?;
        while self.check(&TokenKind::AndAnd) {
            self.advance();
            let rhs = self.parse_equality()?;
            lhs = Expr::Binary { op: BinOp::And, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_relational()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::GtEq => BinOp::GtEq,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_primary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_primary()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        match self.peek().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Str(s))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            TokenKind::This => {
                self.advance();
                Ok(Expr::ThisObject)
            }
            TokenKind::Player => {
                self.advance();
                Ok(Expr::ThisPlayer)
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Ident(name))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            found => {
                let span = self.peek_span();
                Err(CompileError::UnexpectedToken { found, expected: "expression".into(), span })
            }
        }
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
