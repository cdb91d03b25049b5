// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types at the `mf-core` public boundary.
//!
//! One `thiserror` enum per concern, following the teacher's convention of
//! scoping error types to the module that raises them rather than a single
//! workspace-wide error type.

use crate::id::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no blueprint registered at {0}")]
    NoSuchBlueprint(String),
    #[error("a blueprint is already registered at {0}")]
    BlueprintExists(String),
    #[error("no such object: {0}")]
    NoSuchObject(ObjectId),
    #[error("object {0} is destructed")]
    Destructed(ObjectId),
    #[error("move would create a containment cycle")]
    Cycle,
}

#[derive(Debug, Error)]
pub enum ShadowError {
    #[error("a shadow with id {0} is already attached to this target")]
    AlreadyAttached(crate::id::ShadowId),
    #[error("no such shadow: {0}")]
    NoSuchShadow(crate::id::ShadowId),
}
