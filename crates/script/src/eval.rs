// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tree-walking evaluator for verb bodies.

use std::collections::HashMap;

use mf_core::{ObjectId, PropertyBag, PropertyValue, ScriptContext};

use crate::ast::{BinOp, Expr, Stmt};

/// Bindings visible while evaluating one verb call.
pub struct Env<'a> {
    pub properties: &'a mut PropertyBag,
    pub params: HashMap<String, PropertyValue>,
    pub ctx: &'a mut dyn ScriptContext,
}

pub enum Flow {
    Normal,
    Return(PropertyValue),
}

fn as_number(value: &PropertyValue) -> Option<f64> {
    value.as_f64()
}

fn as_bool(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::Bool(b) => *b,
        PropertyValue::Null => false,
        PropertyValue::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        PropertyValue::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn object_id_value(id: &ObjectId) -> PropertyValue {
    PropertyValue::String(id.to_string())
}

pub fn eval_expr(expr: &Expr, env: &mut Env) -> Result<PropertyValue, String> {
    match expr {
        Expr::Number(n) => Ok(serde_json::json!(*n)),
        Expr::Str(s) => Ok(PropertyValue::String(s.clone())),
        Expr::Bool(b) => Ok(PropertyValue::Bool(*b)),
        Expr::ThisObject => Ok(object_id_value(&env.ctx.this_object())),
        Expr::ThisPlayer => Ok(env.ctx.this_player().map(|id| object_id_value(&id)).unwrap_or(PropertyValue::Null)),
        Expr::Ident(name) => {
            if let Some(v) = env.params.get(name) {
                return Ok(v.clone());
            }
            if let Some(v) = env.properties.get(name) {
                return Ok(v.clone());
            }
            Err(format!("unknown identifier '{name}'"))
        }
        Expr::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, env),
    }
}

fn eval_binary(op: BinOp, lhs: &Expr, rhs: &Expr, env: &mut Env) -> Result<PropertyValue, String> {
    // Short-circuit before evaluating the right side.
    if matches!(op, BinOp::And) {
        let l = eval_expr(lhs, env)?;
        return if !as_bool(&l) { Ok(PropertyValue::Bool(false)) } else { eval_expr(rhs, env).map(|r| PropertyValue::Bool(as_bool(&r))) };
    }
    if matches!(op, BinOp::Or) {
        let l = eval_expr(lhs, env)?;
        return if as_bool(&l) { Ok(PropertyValue::Bool(true)) } else { eval_expr(rhs, env).map(|r| PropertyValue::Bool(as_bool(&r))) };
    }

    let l = eval_expr(lhs, env)?;
    let r = eval_expr(rhs, env)?;

    match op {
        BinOp::Eq => return Ok(PropertyValue::Bool(l == r)),
        BinOp::NotEq => return Ok(PropertyValue::Bool(l != r)),
        _ => {}
    }

    match op {
        BinOp::Add => {
            if let (PropertyValue::String(a), PropertyValue::String(b)) = (&l, &r) {
                return Ok(PropertyValue::String(format!("{a}{b}")));
            }
            let (a, b) = numbers(&l, &r)?;
            Ok(serde_json::json!(a + b))
        }
        BinOp::Sub => {
            let (a, b) = numbers(&l, &r)?;
            Ok(serde_json::json!(a - b))
        }
        BinOp::Mul => {
            let (a, b) = numbers(&l, &r)?;
            Ok(serde_json::json!(a * b))
        }
        BinOp::Div => {
            let (a, b) = numbers(&l, &r)?;
            if b == 0.0 {
                return Err("division by zero".to_string());
            }
            Ok(serde_json::json!(a / b))
        }
        BinOp::Lt => {
            let (a, b) = numbers(&l, &r)?;
            Ok(PropertyValue::Bool(a < b))
        }
        BinOp::LtEq => {
            let (a, b) = numbers(&l, &r)?;
            Ok(PropertyValue::Bool(a <= b))
        }
        BinOp::Gt => {
            let (a, b) = numbers(&l, &r)?;
            Ok(PropertyValue::Bool(a > b))
        }
        BinOp::GtEq => {
            let (a, b) = numbers(&l, &r)?;
            Ok(PropertyValue::Bool(a >= b))
        }
        BinOp::Eq | BinOp::NotEq | BinOp::And | BinOp::Or => unreachable!("handled above"),
    }
}

fn numbers(a: &PropertyValue, b: &PropertyValue) -> Result<(f64, f64), String> {
    match (as_number(a), as_number(b)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(format!("expected numbers, got {a} and {b}")),
    }
}

pub fn exec_block(stmts: &[Stmt], env: &mut Env) -> Result<Flow, String> {
    for stmt in stmts {
        match exec_stmt(stmt, env)? {
            Flow::Normal => {}
            ret @ Flow::Return(_) => return Ok(ret),
        }
    }
    Ok(Flow::Normal)
}

fn exec_stmt(stmt: &Stmt, env: &mut Env) -> Result<Flow, String> {
    match stmt {
        Stmt::Set { name, value } => {
            let v = eval_expr(value, env)?;
            env.properties.insert(name.clone(), v);
            Ok(Flow::Normal)
        }
        Stmt::Send { target, message } => {
            let target_val = eval_expr(target, env)?;
            let message_val = eval_expr(message, env)?;
            let target_id = ObjectId::from(property_as_str(&target_val)?);
            let text = property_as_str(&message_val)?;
            env.ctx.send(&target_id, &text);
            Ok(Flow::Normal)
        }
        Stmt::Move { object, destination } => {
            let object_val = eval_expr(object, env)?;
            let dest_val = eval_expr(destination, env)?;
            let object_id = ObjectId::from(property_as_str(&object_val)?);
            let dest_id = ObjectId::from(property_as_str(&dest_val)?);
            env.ctx.move_object(&object_id, &dest_id)?;
            Ok(Flow::Normal)
        }
        Stmt::Schedule { method, args, delay_ms } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expr(arg, env)?);
            }
            let delay = eval_expr(delay_ms, env)?;
            let delay_ms = as_number(&delay).ok_or_else(|| "schedule delay must be a number".to_string())? as u64;
            let object = env.ctx.this_object();
            env.ctx.call_out(object, method.clone(), values, delay_ms);
            Ok(Flow::Normal)
        }
        Stmt::Return(expr) => match expr {
            Some(expr) => Ok(Flow::Return(eval_expr(expr, env)?)),
            None => Ok(Flow::Return(PropertyValue::Null)),
        },
        Stmt::If { cond, then_branch, else_branch } => {
            let cond_val = eval_expr(cond, env)?;
            if as_bool(&cond_val) {
                exec_block(then_branch, env)
            } else {
                exec_block(else_branch, env)
            }
        }
        Stmt::Expr(expr) => {
            eval_expr(expr, env)?;
            Ok(Flow::Normal)
        }
    }
}

fn property_as_str(value: &PropertyValue) -> Result<String, String> {
    match value {
        PropertyValue::String(s) => Ok(s.clone()),
        other => Err(format!("expected a string (object id), got {other}")),
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;
