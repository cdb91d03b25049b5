// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("command module at {0} declares no name")]
    MissingName(String),

    #[error("command module at {0} has no 'execute' verb")]
    MissingExecute(String),

    #[error(transparent)]
    Compile(#[from] mf_script::CompileError),

    #[error(transparent)]
    Vfs(#[from] mf_vfs::VfsError),
}
