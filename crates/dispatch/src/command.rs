// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled `/cmds/<category>/...` modules and the verb→module table built
//! from them at load time (§4.8 "Command modules", §6 "Virtual filesystem
//! layout").

use std::collections::HashMap;
use std::sync::Arc;

use mf_core::{ObjectClass, PermissionLevel, PropertyBag, PropertyValue, ScriptContext};
use mf_script::compile;
use mf_vfs::{Vfs, VfsError};
use tracing::{debug, info, warn};

use crate::error::DispatchError;

/// The four permission-gated command directories (§4.8 "Command modules").
const CATEGORIES: [(&str, PermissionLevel); 4] = [
    ("player", PermissionLevel::Player),
    ("builder", PermissionLevel::Builder),
    ("senior", PermissionLevel::SeniorBuilder),
    ("admin", PermissionLevel::Administrator),
];

/// One compiled command module: a verb/alias list, usage and description
/// strings, and an `execute` verb. Built on the same `mf-script` compiler
/// that blueprints use, since the grammar already covers "properties plus
/// one callable verb" — a command module just never gets cloned into the
/// object registry.
pub struct CommandModule {
    pub path: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub usage: String,
    pub min_level: PermissionLevel,
    class: Arc<dyn ObjectClass>,
    properties: PropertyBag,
}

impl CommandModule {
    fn compile(path: String, min_level: PermissionLevel, source: &str) -> Result<Self, DispatchError> {
        let module = compile(source)?;
        let class: Arc<dyn ObjectClass> = Arc::new(module);
        if !class.has_method("execute") {
            return Err(DispatchError::MissingExecute(path));
        }
        let properties = class.initial_properties();
        let aliases: Vec<String> = string_property(&properties, "name")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if aliases.is_empty() {
            return Err(DispatchError::MissingName(path));
        }
        let description = string_property(&properties, "description").unwrap_or_default();
        let usage = string_property(&properties, "usage").unwrap_or_default();
        Ok(Self { path, aliases, description, usage, min_level, class, properties })
    }

    /// Run `execute` with `args` as its sole parameter. A falsy result means
    /// "fall through" (§4.8 step 4, §6 "execute... ignored except for the
    /// false-means-fallthrough convention").
    pub fn execute(&mut self, args: &str, ctx: &mut dyn ScriptContext) -> Result<bool, String> {
        let result =
            self.class.call_method("execute", &[PropertyValue::String(args.to_string())], &mut self.properties, ctx)?;
        Ok(truthy(&result))
    }
}

fn string_property(bag: &PropertyBag, key: &str) -> Option<String> {
    bag.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

pub(crate) fn truthy(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::Bool(b) => *b,
        PropertyValue::Null => false,
        PropertyValue::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        PropertyValue::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// The global command table, keyed by every alias of every loaded module.
#[derive(Default)]
pub struct CommandTable {
    by_verb: HashMap<String, usize>,
    modules: Vec<CommandModule>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: CommandModule) {
        let index = self.modules.len();
        for alias in &module.aliases {
            if self.by_verb.insert(alias.clone(), index).is_some() {
                warn!(alias, path = %module.path, "command alias shadows an earlier registration");
            }
        }
        self.modules.push(module);
    }

    pub fn resolve_mut(&mut self, verb: &str) -> Option<&mut CommandModule> {
        let index = *self.by_verb.get(verb)?;
        self.modules.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Discover and compile every module under each `/cmds/<category>/`
/// directory that exists. A missing category directory is not an error;
/// an individual module that fails to compile is logged and skipped rather
/// than aborting the whole load.
pub async fn load_command_table(vfs: &Vfs) -> Result<CommandTable, DispatchError> {
    let mut table = CommandTable::new();
    for (category, min_level) in CATEGORIES {
        let dir = format!("/cmds/{category}");
        let entries = match vfs.read_dir(&dir).await {
            Ok(entries) => entries,
            Err(VfsError::NotFound(_)) => continue,
            Err(err) => return Err(DispatchError::from(err)),
        };
        for entry in entries {
            if entry.is_dir {
                continue;
            }
            let path = format!("{dir}/{}", entry.name);
            let source = vfs.read_to_string(&path).await?;
            match CommandModule::compile(path.clone(), min_level, &source) {
                Ok(module) => {
                    debug!(path, aliases = ?module.aliases, "command module loaded");
                    table.insert(module);
                }
                Err(err) => warn!(path, %err, "failed to load command module"),
            }
        }
    }
    info!(count = table.len(), "command table loaded");
    Ok(table)
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
