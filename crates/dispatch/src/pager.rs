// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The line-chunked content pager (§4.9). Content that fits on one page is
//! sent immediately with no handler pushed; longer content gets a
//! [`Pager`] on the viewing player's input-handler stack until they quit.

use mf_core::{Clock, ObjectId, ScriptContext};
use mf_efun::EfunBridge;
use tracing::debug;

use crate::handler::{HandlerStacks, InputHandler};

pub const DEFAULT_LINES_PER_PAGE: usize = 24;

/// Called once, whether or not a [`Pager`] was actually pushed (§4.9
/// "onExit still fires" for single-page content).
pub trait PagerExit<C: Clock>: Send {
    fn on_exit(&mut self, bridge: &mut EfunBridge<C>, player: &ObjectId);
}

/// No-op exit callback for callers that don't need one.
pub struct NoExit;

impl<C: Clock> PagerExit<C> for NoExit {
    fn on_exit(&mut self, _bridge: &mut EfunBridge<C>, _player: &ObjectId) {}
}

#[derive(Clone)]
pub struct PagerOptions {
    pub lines_per_page: usize,
    pub title: Option<String>,
    pub numbered: bool,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self { lines_per_page: DEFAULT_LINES_PER_PAGE, title: None, numbered: false }
    }
}

/// Display `content` to `player`, pushing a handler only if it spans more
/// than one page.
pub fn page<C: Clock>(
    bridge: &mut EfunBridge<C>,
    handlers: &mut HandlerStacks<C>,
    player_name: &str,
    player: &ObjectId,
    content: &str,
    options: PagerOptions,
    mut on_exit: Box<dyn PagerExit<C>>,
) {
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    if lines.len() <= options.lines_per_page {
        let text = render_lines(&lines, 0, lines.len(), &options.title, options.numbered);
        ScriptContext::send(bridge, player, &text);
        on_exit.on_exit(bridge, player);
        return;
    }
    let mut pager = Pager {
        lines,
        lines_per_page: options.lines_per_page.max(1),
        title: options.title,
        numbered: options.numbered,
        top: 0,
        on_exit,
    };
    pager.render_current(bridge, player);
    handlers.push(player_name, Box::new(pager));
}

fn render_lines(lines: &[String], start: usize, end: usize, title: &Option<String>, numbered: bool) -> String {
    let mut out = String::new();
    if let Some(title) = title {
        out.push_str(title);
        out.push('\n');
    }
    for (offset, line) in lines[start..end].iter().enumerate() {
        if numbered {
            out.push_str(&format!("{:>4}  {}\n", start + offset + 1, line));
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

struct Pager<C: Clock> {
    lines: Vec<String>,
    lines_per_page: usize,
    title: Option<String>,
    numbered: bool,
    top: usize,
    on_exit: Box<dyn PagerExit<C>>,
}

impl<C: Clock> Pager<C> {
    fn last_page_top(&self) -> usize {
        if self.lines.is_empty() {
            return 0;
        }
        ((self.lines.len() - 1) / self.lines_per_page) * self.lines_per_page
    }

    fn advance_page(&mut self) {
        self.top = (self.top + self.lines_per_page).min(self.last_page_top());
    }

    fn retreat_page(&mut self) {
        self.top = self.top.saturating_sub(self.lines_per_page);
    }

    /// Jump to the page containing 1-based `line_number` (§4.9 "a numeric
    /// line number ... jump to that line, which becomes the top of the
    /// current page").
    fn jump_to_line(&mut self, line_number: usize) {
        if line_number == 0 || self.lines.is_empty() {
            return;
        }
        let index = line_number.saturating_sub(1).min(self.lines.len() - 1);
        self.top = (index / self.lines_per_page) * self.lines_per_page;
    }

    /// First occurrence of `needle` at or after the line following the
    /// current page top, case-insensitive (§4.9 "/text forward search").
    fn search_forward(&self, needle: &str) -> Option<usize> {
        let needle = needle.to_lowercase();
        let start = self.top + 1;
        self.lines
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, line)| line.to_lowercase().contains(&needle))
            .map(|(index, _)| (index / self.lines_per_page) * self.lines_per_page)
    }

    fn render_current(&mut self, bridge: &mut EfunBridge<C>, player: &ObjectId) {
        let end = (self.top + self.lines_per_page).min(self.lines.len());
        let mut out = render_lines(&self.lines, self.top, end, &self.title, self.numbered);
        let remaining = self.lines.len().saturating_sub(end);
        if remaining > 0 {
            out.push_str(&format!("-- more ({remaining} lines remaining; Enter/n/p/g/q) --"));
        } else {
            out.push_str("-- end (p/g/q) --");
        }
        ScriptContext::send(bridge, player, &out);
    }
}

impl<C: Clock> InputHandler<C> for Pager<C> {
    fn handle_line(&mut self, bridge: &mut EfunBridge<C>, player: &ObjectId, line: &str) -> bool {
        let line = line.trim();
        match line {
            "" | "n" => {
                self.advance_page();
                self.render_current(bridge, player);
                true
            }
            "p" | "b" => {
                self.retreat_page();
                self.render_current(bridge, player);
                true
            }
            "g" => {
                self.top = 0;
                self.render_current(bridge, player);
                true
            }
            "q" => {
                self.on_exit.on_exit(bridge, player);
                debug!("pager quit");
                false
            }
            _ if line.starts_with('/') => {
                if let Some(found) = self.search_forward(&line[1..]) {
                    self.top = found;
                }
                self.render_current(bridge, player);
                true
            }
            _ => {
                if let Ok(number) = line.parse::<usize>() {
                    self.jump_to_line(number);
                }
                self.render_current(bridge, player);
                true
            }
        }
    }

    fn on_cancel(&mut self, bridge: &mut EfunBridge<C>, player: &ObjectId) {
        self.on_exit.on_exit(bridge, player);
    }
}

#[cfg(test)]
#[path = "pager_tests.rs"]
mod tests;
