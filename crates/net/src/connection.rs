// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-connection read/write tasks. Generic over the underlying stream so
//! it works the same whether the `TcpListener` handed back a plain or
//! TLS-terminated socket (mirrors the teacher's reader/writer-generic
//! `handle_connection`).

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use mf_core::ConnectionId;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, info, warn};

use crate::event::InboundEvent;
use crate::frame::InboundFrame;
use crate::registry::{ConnectionRegistry, WriterMsg};
use crate::state::ConnectionState;

/// Drive one accepted WebSocket connection until it closes or idles out.
/// Registers `connection`'s outbound channel, forwards inbound frames onto
/// `events`, and tears everything down on exit (§4.11 "any state ->
/// Closed").
pub async fn run_connection<S>(
    ws: WebSocketStream<S>,
    connection: ConnectionId,
    remote_addr: String,
    registry: Arc<ConnectionRegistry>,
    events: mpsc::UnboundedSender<InboundEvent>,
    idle_timeout: Duration,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sink, mut stream) = ws.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<WriterMsg>();
    registry.insert(connection, outbound_tx);
    registry.set_state(connection, ConnectionState::Unbound);

    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let outcome = match msg {
                WriterMsg::Frame(text) => sink.send(Message::Text(text.into())).await,
                WriterMsg::Close => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            };
            if let Err(error) = outcome {
                debug!(%connection, %error, "write failed, closing connection");
                break;
            }
        }
    });

    if events.send(InboundEvent::Connected { connection, remote_addr }).is_err() {
        warn!(%connection, "world event channel closed, dropping connection");
        writer.abort();
        registry.remove(connection);
        return;
    }

    loop {
        tokio::select! {
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => match InboundFrame::parse(&text.to_string()) {
                        Ok(InboundFrame::Input { line }) => {
                            if events.send(InboundEvent::Line { connection, line }).is_err() {
                                break;
                            }
                        }
                        Ok(InboundFrame::Gui { payload }) => {
                            if events.send(InboundEvent::GuiResponse { connection, payload }).is_err() {
                                break;
                            }
                        }
                        Err(error) => debug!(%connection, %error, "dropped malformed inbound frame"),
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                    Some(Ok(_)) => debug!(%connection, "ignoring non-text frame"),
                    Some(Err(error)) => {
                        debug!(%connection, %error, "websocket read error");
                        break;
                    }
                }
            }
            _ = tokio::time::sleep(idle_timeout) => {
                info!(%connection, "connection idle timeout");
                break;
            }
        }
    }

    registry.set_state(connection, ConnectionState::Closed);
    registry.remove(connection);
    writer.abort();
    let _ = events.send(InboundEvent::Disconnected { connection });
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
