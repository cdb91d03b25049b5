// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VfsError {
    #[error("path escapes the mudlib root: {0}")]
    PathTraversal(String),
    #[error("path must be absolute (start with '/'): {0}")]
    NotAbsolute(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),
    #[error("io error on {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
}

impl VfsError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
