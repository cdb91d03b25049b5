// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command dispatcher itself (§4.8): resolves one input line against,
//! in order, the player's handler stack, on-object actions in the
//! player's environment, on-object actions on inventory, the global
//! `/cmds/...` table, and finally the built-in soul table.

use mf_core::{Clock, ObjectId, PermissionLevel, PropertyValue, ScriptContext};
use mf_efun::{CommandExecutor, EfunBridge};
use tracing::warn;

use crate::command::{truthy, CommandTable};
use crate::handler::HandlerStacks;
use crate::soul;

const GENERIC_FAILURE: &str = "Something went wrong.";

fn split_verb(line: &str) -> (String, String) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb.to_lowercase(), rest.trim_start().to_string()),
        None => (line.to_lowercase(), String::new()),
    }
}

/// Owns the global command table and every player's input-handler stack,
/// and implements [`CommandExecutor`] so the efun bridge can drive it.
pub struct Dispatcher<C: Clock> {
    commands: CommandTable,
    handlers: HandlerStacks<C>,
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(commands: CommandTable) -> Self {
        Self { commands, handlers: HandlerStacks::new() }
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn handlers_mut(&mut self) -> &mut HandlerStacks<C> {
        &mut self.handlers
    }

    /// Resolve and run `line` for `player_name`/`player`. Returns `true` if
    /// anything consumed it (including a denial message for a gated
    /// command — the line was still handled, just refused).
    pub fn dispatch(&mut self, bridge: &mut EfunBridge<C>, player_name: &str, player: &ObjectId, line: &str) -> bool {
        if self.handlers.dispatch(bridge, player_name, player, line) {
            return true;
        }

        let (verb, args) = split_verb(line);
        if verb.is_empty() {
            return false;
        }

        if let Some(environment) = bridge.environment(player) {
            if self.try_object_actions(bridge, &environment, player, &verb, &args) {
                return true;
            }
            for occupant in bridge.all_inventory(&environment) {
                if occupant == *player {
                    continue;
                }
                if self.try_object_actions(bridge, &occupant, player, &verb, &args) {
                    return true;
                }
            }
        }
        for item in bridge.all_inventory(player) {
            if self.try_object_actions(bridge, &item, player, &verb, &args) {
                return true;
            }
        }

        if self.try_command_table(bridge, player_name, player, &verb, &args) {
            return true;
        }

        if let Some(emote) = soul::resolve(&verb) {
            let target = (!args.is_empty()).then_some(args.as_str());
            let text = soul::render(emote, player_name, target);
            self.broadcast_room(bridge, player, &text);
            return true;
        }

        false
    }

    fn try_object_actions(&mut self, bridge: &mut EfunBridge<C>, object: &ObjectId, player: &ObjectId, verb: &str, args: &str) -> bool {
        for candidate in bridge.action_candidates(object, verb) {
            let call_args = [PropertyValue::String(args.to_string())];
            match bridge.invoke_verb(object, Some(player.clone()), &candidate.method, &call_args) {
                Ok(result) if truthy(&result) => return true,
                Ok(_) => continue,
                Err(error) => {
                    warn!(%object, method = %candidate.method, %error, "action handler failed");
                    self.report_failure(bridge, player, &error);
                    return true;
                }
            }
        }
        false
    }

    fn try_command_table(&mut self, bridge: &mut EfunBridge<C>, player_name: &str, player: &ObjectId, verb: &str, args: &str) -> bool {
        let level = bridge.get_permission_level(player_name);
        let Some(module) = self.commands.resolve_mut(verb) else { return false };
        if level < module.min_level {
            ScriptContext::send(bridge, player, "You are not permitted to do that.");
            return true;
        }
        bridge.set_context(player.clone(), Some(player.clone()));
        let outcome = module.execute(args, bridge);
        bridge.clear_context();
        match outcome {
            Ok(true) => true,
            Ok(false) => false,
            Err(error) => {
                warn!(path = %module.path, %error, "command handler failed");
                self.report_failure(bridge, player, &error);
                true
            }
        }
    }

    /// A handler exception surfaces as a generic message to ordinary
    /// players; a builder or above sees the underlying error (§7 "Error
    /// handling design").
    fn report_failure(&self, bridge: &mut EfunBridge<C>, player: &ObjectId, error: &str) {
        let player_name = bridge.player_name_of(player).unwrap_or_default();
        let message = if bridge.get_permission_level(&player_name) >= PermissionLevel::Builder {
            error.to_string()
        } else {
            GENERIC_FAILURE.to_string()
        };
        ScriptContext::send(bridge, player, &message);
    }

    fn broadcast_room(&mut self, bridge: &mut EfunBridge<C>, player: &ObjectId, text: &str) {
        match bridge.environment(player) {
            Some(environment) => {
                for occupant in bridge.all_inventory(&environment) {
                    ScriptContext::send(bridge, &occupant, text);
                }
            }
            None => ScriptContext::send(bridge, player, text),
        }
    }
}

impl<C: Clock> CommandExecutor<C> for Dispatcher<C> {
    fn execute(&mut self, bridge: &mut EfunBridge<C>, player: &ObjectId, line: &str) -> bool {
        let player_name = bridge.player_name_of(player).unwrap_or_else(|| player.as_str().to_string());
        self.dispatch(bridge, &player_name, player, line)
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
