// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level driver errors (§7 kind 4 "system fault" at the process
//! boundary). `anyhow` carries everything past this point in `main`; this
//! enum only exists so startup failures map to the exit codes §6 specifies.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to bind listener on {addr}: {source}")]
    Bind { addr: SocketAddr, #[source] source: mf_net::NetError },

    #[error("failed to load bootstrap script at {path}: {source}")]
    Bootstrap { path: PathBuf, #[source] source: mf_script::CompileError },

    #[error("failed to load command table: {0}")]
    Commands(#[from] mf_dispatch::DispatchError),

    #[error("mudlib root {0} does not exist or is not a directory")]
    InvalidRoot(PathBuf),
}
