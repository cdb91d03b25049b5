// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiles parsed object definitions into [`ObjectClass`] implementations.

use std::collections::HashMap;

use mf_core::{ObjectClass, PropertyBag, PropertyValue, ScriptContext};

use crate::ast::{Expr, ObjectDef, VerbDef};
use crate::error::CompileError;
use crate::eval::{exec_block, Env, Flow};
use crate::parser::Parser;

/// A compiled blueprint: parsed source turned into callable verbs.
///
/// Hot-reload (§4.5) replaces a blueprint's class handle wholesale with a
/// freshly compiled `CompiledModule`; existing clones keep their property
/// bag untouched and simply resolve methods through the new module.
#[derive(Debug)]
pub struct CompiledModule {
    pub path: String,
    pub depends_on: Vec<String>,
    properties: Vec<(String, PropertyValue)>,
    verbs: HashMap<String, VerbDef>,
}

/// Compile `source` (the text of one `.obj` file) into a [`CompiledModule`].
///
/// Property initializers are restricted to literals: they run before any
/// object exists to serve as `this`/`player`, so there is nothing meaningful
/// for `this`/`player`/other-property references to resolve against.
pub fn compile(source: &str) -> Result<CompiledModule, CompileError> {
    let def: ObjectDef = Parser::parse(source)?;
    compile_def(def)
}

fn compile_def(def: ObjectDef) -> Result<CompiledModule, CompileError> {
    let mut properties = Vec::with_capacity(def.properties.len());
    for (name, expr) in &def.properties {
        properties.push((name.clone(), literal_value(expr, &name)?));
    }

    let mut verbs = HashMap::with_capacity(def.verbs.len());
    for verb in def.verbs {
        verbs.insert(verb.name.clone(), verb);
    }

    Ok(CompiledModule { path: def.path, depends_on: def.depends_on, properties, verbs })
}

fn literal_value(expr: &Expr, prop_name: &str) -> Result<PropertyValue, CompileError> {
    match expr {
        Expr::Number(n) => Ok(serde_json::json!(*n)),
        Expr::Str(s) => Ok(PropertyValue::String(s.clone())),
        Expr::Bool(b) => Ok(PropertyValue::Bool(*b)),
        _ => Err(CompileError::TypeError {
            verb: format!("<properties:{prop_name}>"),
            message: "property initializers must be literals".to_string(),
        }),
    }
}

impl ObjectClass for CompiledModule {
    fn initial_properties(&self) -> PropertyBag {
        let mut bag = PropertyBag::new();
        for (name, value) in &self.properties {
            bag.insert(name.clone(), value.clone());
        }
        bag
    }

    fn has_method(&self, name: &str) -> bool {
        self.verbs.contains_key(name)
    }

    fn call_method(
        &self,
        name: &str,
        args: &[PropertyValue],
        properties: &mut PropertyBag,
        ctx: &mut dyn ScriptContext,
    ) -> Result<PropertyValue, String> {
        let verb = self.verbs.get(name).ok_or_else(|| format!("no such method: {name}"))?;
        if args.len() < verb.params.len() {
            return Err(format!(
                "{name}: expected {} argument(s), got {}",
                verb.params.len(),
                args.len()
            ));
        }
        let params = verb
            .params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect::<HashMap<_, _>>();

        let mut env = Env { properties, params, ctx };
        match exec_block(&verb.body, &mut env)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(PropertyValue::Null),
        }
    }
}

/// Evaluate one of a module's own verbs without going through `ObjectClass`,
/// useful for tooling that wants diagnostics without a live registry.
pub fn eval_standalone(module: &CompiledModule, verb: &str, env: &mut Env) -> Result<PropertyValue, String> {
    let verb = module.verbs.get(verb).ok_or_else(|| format!("no such method: {verb}"))?;
    match exec_block(&verb.body, env)? {
        Flow::Return(value) => Ok(value),
        Flow::Normal => Ok(PropertyValue::Null),
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
