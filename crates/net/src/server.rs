// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The WebSocket accept loop (§4.11, §6 "one connection per client").
//! Mirrors the teacher's `Listener`: bind once, then spawn a task per
//! accepted connection so a slow handshake or a stalled client never
//! blocks the rest of the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mf_core::{Clock, ConnectionId};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::connection::run_connection;
use crate::error::NetError;
use crate::event::InboundEvent;
use crate::rate_limit::HandshakeLimiter;
use crate::registry::ConnectionRegistry;

/// How long a connection may sit idle before it is closed (§5 "Cancellation
/// and timeouts").
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

pub struct NetServer<C: Clock> {
    listener: TcpListener,
    registry: Arc<ConnectionRegistry>,
    events: mpsc::UnboundedSender<InboundEvent>,
    rate_limiter: Arc<HandshakeLimiter<C>>,
    idle_timeout: Duration,
}

impl<C: Clock> NetServer<C> {
    pub async fn bind(
        addr: SocketAddr,
        registry: Arc<ConnectionRegistry>,
        events: mpsc::UnboundedSender<InboundEvent>,
        rate_limiter: Arc<HandshakeLimiter<C>>,
        idle_timeout: Duration,
    ) -> Result<Self, NetError> {
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "listening for websocket connections");
        Ok(Self { listener, registry, events, rate_limiter, idle_timeout })
    }

    /// Accept connections until the socket itself errors out.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => self.spawn_connection(stream, peer),
                Err(error) => error!(%error, "accept error"),
            }
        }
    }

    fn spawn_connection(&self, stream: tokio::net::TcpStream, peer: SocketAddr) {
        if !self.rate_limiter.check(peer.ip()) {
            warn!(%peer, "refusing connection: handshake rate limit exhausted");
            return;
        }
        let registry = Arc::clone(&self.registry);
        let events = self.events.clone();
        let idle_timeout = self.idle_timeout;
        tokio::spawn(async move {
            let connection = ConnectionId::new();
            match tokio_tungstenite::accept_async(stream).await {
                Ok(ws) => {
                    debug!(%connection, %peer, "websocket handshake complete");
                    run_connection(ws, connection, peer.to_string(), registry, events, idle_timeout).await;
                }
                Err(error) => warn!(%peer, %error, "websocket handshake failed"),
            }
        });
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
