// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ast::{BinOp, Expr, Stmt};

const COUNTER: &str = r#"
object "/std/counter" {
    depends on "/std/base"

    properties {
        count: 0
    }

    verb tick() {
        set count = count + 1
    }

    verb add(n) {
        set count = count + n
        return count
    }
}
"#;

#[test]
fn parses_full_object_definition() {
    let def = Parser::parse(COUNTER).unwrap();
    assert_eq!(def.path, "/std/counter");
    assert_eq!(def.depends_on, vec!["/std/base".to_string()]);
    assert_eq!(def.properties, vec![("count".to_string(), Expr::Number(0.0))]);
    assert_eq!(def.verbs.len(), 2);
    assert_eq!(def.verbs[0].name, "tick");
    assert_eq!(def.verbs[1].params, vec!["n".to_string()]);
}

#[test]
fn parses_binary_precedence() {
    let def = Parser::parse(
        r#"object "/x" { verb v() { return 1 + 2 * 3 == 7 && true } }"#,
    )
    .unwrap();
    let Stmt::Return(Some(expr)) = &def.verbs[0].body[0] else { panic!("expected return") };
    let Expr::Binary { op: BinOp::And, .. } = expr else { panic!("top level should be &&, got {expr:?}") };
}

#[test]
fn rejects_duplicate_verb_names() {
    let src = r#"object "/x" { verb v() { } verb v() { } }"#;
    assert!(Parser::parse(src).is_err());
}

#[test]
fn parses_if_else() {
    let def = Parser::parse(
        r#"object "/x" { verb v() { if count > 0 { return 1 } else { return 0 } } }"#,
    )
    .unwrap();
    assert!(matches!(def.verbs[0].body[0], Stmt::If { .. }));
}

#[test]
fn parses_send_move_schedule() {
    let def = Parser::parse(
        r#"object "/x" {
            verb v() {
                send player, "hello"
                move this, player
                schedule "tick"() after 100
            }
        }"#,
    )
    .unwrap();
    assert!(matches!(def.verbs[0].body[0], Stmt::Send { .. }));
    assert!(matches!(def.verbs[0].body[1], Stmt::Move { .. }));
    assert!(matches!(def.verbs[0].body[2], Stmt::Schedule { .. }));
}

#[test]
fn unexpected_token_reports_span() {
    let err = Parser::parse(r#"object "/x" { verb v( { } }"#).unwrap_err();
    assert!(err.span().is_some());
}
