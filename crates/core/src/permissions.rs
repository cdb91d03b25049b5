// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permission levels and path-based ACLs (§4.2).

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{info, warn};

/// The four privilege levels a player name can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum PermissionLevel {
    Player = 0,
    Builder = 1,
    SeniorBuilder = 2,
    Administrator = 3,
}

impl PermissionLevel {
    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            0 => Some(Self::Player),
            1 => Some(Self::Builder),
            2 => Some(Self::SeniorBuilder),
            3 => Some(Self::Administrator),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_admin(self) -> bool {
        self == Self::Administrator
    }

    pub fn is_builder(self) -> bool {
        self >= Self::Builder
    }
}

impl Default for PermissionLevel {
    fn default() -> Self {
        Self::Player
    }
}

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("permission level {0} is out of range (expected 0..=3)")]
    LevelOutOfRange(u8),
    #[error("only an administrator may change permission levels")]
    NotAdmin,
    #[error("no caller context and an administrator already exists; cannot bootstrap")]
    CannotBootstrap,
}

/// A single path-prefix ACL rule set plus the per-name level table.
///
/// `checkReadPermission`/`checkWritePermission` consult this purely by path
/// and caller level; the efun bridge is responsible for resolving "caller"
/// from its current context before calling in.
#[derive(Debug, Default)]
pub struct Permissions {
    levels: HashMap<String, PermissionLevel>,
    builder_paths: Vec<String>,
    senior_paths: Vec<String>,
    protected_paths: Vec<String>,
    forbidden_files: HashSet<String>,
}

impl Permissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level for `name`, defaulting to [`PermissionLevel::Player`] for unknown names.
    pub fn level_of(&self, name: &str) -> PermissionLevel {
        self.levels.get(&name.to_lowercase()).copied().unwrap_or_default()
    }

    pub fn is_admin(&self, name: &str) -> bool {
        self.level_of(name).is_admin()
    }

    pub fn is_builder(&self, name: &str) -> bool {
        self.level_of(name).is_builder()
    }

    fn has_admin(&self) -> bool {
        self.levels.values().any(|l| l.is_admin())
    }

    /// Set `name`'s level. `caller` is `None` for the bootstrap path: the
    /// very first admin may be set with no caller context, but only while no
    /// admin exists yet (§4.2).
    pub fn set_level(
        &mut self,
        caller: Option<&str>,
        name: &str,
        level: u8,
    ) -> Result<(), PermissionError> {
        let level = PermissionLevel::from_u8(level).ok_or(PermissionError::LevelOutOfRange(level))?;
        match caller {
            Some(caller) if self.is_admin(caller) => {}
            Some(_) => return Err(PermissionError::NotAdmin),
            None if !self.has_admin() => {
                info!(name, "bootstrapping first administrator");
            }
            None => return Err(PermissionError::CannotBootstrap),
        }
        self.levels.insert(name.to_lowercase(), level);
        Ok(())
    }

    pub fn add_builder_path(&mut self, prefix: impl Into<String>) {
        self.builder_paths.push(prefix.into());
    }

    pub fn add_senior_path(&mut self, prefix: impl Into<String>) {
        self.senior_paths.push(prefix.into());
    }

    pub fn add_protected_path(&mut self, prefix: impl Into<String>) {
        self.protected_paths.push(prefix.into());
    }

    pub fn add_forbidden_file(&mut self, path: impl Into<String>) {
        self.forbidden_files.insert(path.into());
    }

    fn is_forbidden(&self, path: &str) -> bool {
        self.forbidden_files.contains(path)
    }

    fn min_level_for(&self, path: &str) -> PermissionLevel {
        if self.protected_paths.iter().any(|p| path.starts_with(p.as_str())) {
            PermissionLevel::Administrator
        } else if self.senior_paths.iter().any(|p| path.starts_with(p.as_str())) {
            PermissionLevel::SeniorBuilder
        } else if self.builder_paths.iter().any(|p| path.starts_with(p.as_str())) {
            PermissionLevel::Builder
        } else {
            PermissionLevel::Player
        }
    }

    /// Readable unless forbidden outright.
    pub fn check_read(&self, name: &str, path: &str) -> bool {
        if self.is_forbidden(path) {
            warn!(path, name, "read denied: forbidden file");
            return false;
        }
        true
    }

    /// Writable iff admin, or at/above the path's minimum level and not forbidden.
    pub fn check_write(&self, name: &str, path: &str) -> bool {
        let level = self.level_of(name);
        if level.is_admin() {
            return true;
        }
        if self.is_forbidden(path) {
            return false;
        }
        level >= self.min_level_for(path)
    }
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
