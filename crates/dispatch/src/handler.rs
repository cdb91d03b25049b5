// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-player input-handler stacks (§4.8 step 1, §5 "Cancellation and
//! timeouts"). When a player has a handler on its stack (a pager, a
//! multi-line editor, a yes/no prompt), the next line of input goes to it
//! instead of the command dispatch pipeline.

use std::collections::HashMap;

use mf_core::{Clock, ObjectId};
use mf_efun::EfunBridge;
use tracing::debug;

/// A handler consuming raw input lines for one player, pushed onto that
/// player's stack. Returning `true` from [`Self::handle_line`] keeps the
/// handler on top for the next line; returning `false` pops it.
pub trait InputHandler<C: Clock>: Send {
    fn handle_line(&mut self, bridge: &mut EfunBridge<C>, player: &ObjectId, line: &str) -> bool;

    /// Called when the stack is unwound from above (idle timeout, forced
    /// disconnect) rather than the handler popping itself. Default is a
    /// no-op; handlers holding a resource (a pending edit buffer) override
    /// it to flush or discard.
    fn on_cancel(&mut self, bridge: &mut EfunBridge<C>, player: &ObjectId) {
        let _ = (bridge, player);
    }
}

/// Per-player input-handler stacks, keyed by player name (case-insensitive,
/// matching the rest of the connection/session bookkeeping).
pub struct HandlerStacks<C: Clock> {
    stacks: HashMap<String, Vec<Box<dyn InputHandler<C>>>>,
}

impl<C: Clock> Default for HandlerStacks<C> {
    fn default() -> Self {
        Self { stacks: HashMap::new() }
    }
}

impl<C: Clock> HandlerStacks<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, player_name: &str, handler: Box<dyn InputHandler<C>>) {
        self.stacks.entry(player_name.to_lowercase()).or_default().push(handler);
    }

    pub fn is_empty(&self, player_name: &str) -> bool {
        self.stacks.get(&player_name.to_lowercase()).is_none_or(Vec::is_empty)
    }

    /// Feed `line` to the top handler for `player_name`, if any. Returns
    /// `true` if a handler existed and consumed the line — whether or not it
    /// stayed on the stack — meaning the dispatch pipeline must not also run
    /// (§4.8 step 1).
    pub fn dispatch(&mut self, bridge: &mut EfunBridge<C>, player_name: &str, player: &ObjectId, line: &str) -> bool {
        let key = player_name.to_lowercase();
        let Some(stack) = self.stacks.get_mut(&key) else { return false };
        let Some(mut top) = stack.pop() else { return false };
        let keep = top.handle_line(bridge, player, line);
        if keep {
            stack.push(top);
        }
        true
    }

    /// Unwind `player_name`'s stack top-to-bottom with a cancel signal
    /// (§5: idle timeout or forced disconnect unwinds the stack).
    pub fn cancel_all(&mut self, bridge: &mut EfunBridge<C>, player_name: &str, player: &ObjectId) {
        let key = player_name.to_lowercase();
        let Some(mut stack) = self.stacks.remove(&key) else { return };
        while let Some(mut handler) = stack.pop() {
            handler.on_cancel(bridge, player);
        }
        debug!(player_name, "input-handler stack cancelled");
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
