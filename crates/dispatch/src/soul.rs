// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The built-in emote/soul table (§4.8 step 3(d)): a small fixed set of
//! social verbs content never has to define, tried only after the on-object
//! action table and the global `/cmds/...` table both miss.

/// One emote's rendering templates, with and without a target.
pub struct Emote {
    pub verb: &'static str,
    alone: &'static str,
    targeted: &'static str,
}

const EMOTES: &[Emote] = &[
    Emote { verb: "smile", alone: "{name} smiles.", targeted: "{name} smiles at {target}." },
    Emote { verb: "wave", alone: "{name} waves.", targeted: "{name} waves at {target}." },
    Emote { verb: "nod", alone: "{name} nods.", targeted: "{name} nods at {target}." },
    Emote { verb: "laugh", alone: "{name} laughs.", targeted: "{name} laughs at {target}." },
    Emote { verb: "bow", alone: "{name} bows.", targeted: "{name} bows to {target}." },
    Emote { verb: "dance", alone: "{name} dances around.", targeted: "{name} dances with {target}." },
    Emote { verb: "frown", alone: "{name} frowns.", targeted: "{name} frowns at {target}." },
    Emote { verb: "cheer", alone: "{name} cheers.", targeted: "{name} cheers for {target}." },
];

/// Look up `verb` (already lowercased by the dispatcher) in the soul table.
pub fn resolve(verb: &str) -> Option<&'static Emote> {
    EMOTES.iter().find(|e| e.verb == verb)
}

/// Render `emote` as seen by onlookers, substituting the actor's name and,
/// when present, the raw target text from the command line.
pub fn render(emote: &Emote, name: &str, target: Option<&str>) -> String {
    match target {
        Some(target) => emote.targeted.replace("{name}", name).replace("{target}", target),
        None => emote.alone.replace("{name}", name),
    }
}

#[cfg(test)]
#[path = "soul_tests.rs"]
mod tests;
