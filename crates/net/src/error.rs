// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from the WebSocket transport layer (§4.11, §7 "system fault").

use thiserror::Error;

use crate::state::ConnectionState;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame of {size} bytes exceeds the {limit} byte ceiling")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("handshake rate limit exceeded for this address")]
    RateLimited,

    #[error("invalid connection state transition: {from:?} -> {to:?}")]
    InvalidTransition { from: ConnectionState, to: ConnectionState },

    #[error("connection is closed")]
    Closed,

    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}
