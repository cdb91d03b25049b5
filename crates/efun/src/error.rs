// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the efun bridge (§4.7, §7).

use mf_core::{RegistryError, ShadowError};
use mf_session::SessionError;
use mf_vfs::VfsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EfunError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Shadow(#[from] ShadowError),

    #[error(transparent)]
    Vfs(#[from] VfsError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("no such player '{0}'")]
    NoSuchPlayer(String),

    #[error("no such connection")]
    NoSuchConnection,

    #[error("{0}")]
    Other(String),
}

/// The `{success, error?}` discriminant §4.7 and §7 call for on fallible
/// admin operations, rather than a user-visible exception.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdminResult {
    pub success: bool,
    pub error: Option<String>,
}

impl AdminResult {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, error: Some(message.into()) }
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for AdminResult {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => AdminResult::ok(),
            Err(e) => AdminResult::failure(e.to_string()),
        }
    }
}
