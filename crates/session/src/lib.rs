// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mf-session`: HMAC-signed reconnect tokens (§4.10).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod error;

pub use error::SessionError;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use hmac::{Hmac, Mac};
use parking_lot::RwLock;
use rand::RngCore;
use sha2::Sha256;
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use mf_core::{Clock, ConnectionId};

type HmacSha256 = Hmac<Sha256>;

/// The five fields carried by a session token (§3 "Player record").
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionPayload {
    pub name: String,
    pub connection_id: String,
    pub address: String,
    pub expires_at_ms: u64,
    pub nonce: String,
}

/// A live session, as stored in the active-sessions map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub name: String,
    pub connection_id: ConnectionId,
    pub address: String,
    pub expires_at_ms: u64,
}

/// A freshly minted token plus its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at_ms: u64,
}

/// HMAC-signed reconnect tokens with TTL and optional IP binding.
pub struct SessionManager<C: Clock> {
    secret: Vec<u8>,
    ttl_ms: u64,
    bind_ip: bool,
    clock: C,
    sessions: RwLock<HashMap<ConnectionId, SessionRecord>>,
}

impl<C: Clock> SessionManager<C> {
    pub fn new(secret: Vec<u8>, ttl_ms: u64, bind_ip: bool, clock: C) -> Self {
        Self { secret, ttl_ms, bind_ip, clock, sessions: RwLock::new(HashMap::new()) }
    }

    /// Generate a random secret, for the "randomly generated at startup if
    /// unconfigured" fallback (§4.10).
    pub fn random_secret() -> Vec<u8> {
        let mut bytes = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    }

    pub fn create_token(&self, player_name: &str, connection_id: ConnectionId, address: &str) -> IssuedToken {
        let expires_at_ms = self.clock.epoch_ms() + self.ttl_ms;
        let mut nonce_bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let payload = SessionPayload {
            name: player_name.to_lowercase(),
            connection_id: connection_id.to_string(),
            address: address.to_string(),
            expires_at_ms,
            nonce: B64.encode(nonce_bytes),
        };
        let payload_json = serde_json::to_vec(&payload).expect("session payload is always serializable");
        let sig = self.sign(&payload_json);
        let token = format!("{}.{}", B64.encode(&payload_json), B64.encode(sig));

        self.sessions.write().insert(
            connection_id,
            SessionRecord {
                name: payload.name,
                connection_id,
                address: payload.address,
                expires_at_ms,
            },
        );
        info!(%connection_id, "session created");
        IssuedToken { token, expires_at_ms }
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    /// Validate `token`, optionally checking it was issued for `remote_addr`.
    pub fn validate(&self, token: &str, remote_addr: Option<&str>) -> Result<SessionRecord, SessionError> {
        let (payload_b64, sig_b64) = token.split_once('.').ok_or(SessionError::Malformed)?;
        let payload_json = B64.decode(payload_b64).map_err(|_| SessionError::Malformed)?;
        let given_sig = B64.decode(sig_b64).map_err(|_| SessionError::Malformed)?;
        let expected_sig = self.sign(&payload_json);

        if given_sig.len() != expected_sig.len() || given_sig.ct_eq(&expected_sig).unwrap_u8() != 1 {
            warn!("session token signature mismatch");
            return Err(SessionError::BadSignature);
        }

        let payload: SessionPayload = serde_json::from_slice(&payload_json).map_err(|_| SessionError::Malformed)?;
        let connection_id = ConnectionId::from_string(&payload.connection_id);

        let sessions = self.sessions.read();
        let record = sessions.get(&connection_id).ok_or(SessionError::NotFound)?;

        if record.expires_at_ms <= self.clock.epoch_ms() {
            return Err(SessionError::Expired);
        }
        if self.bind_ip {
            if let Some(addr) = remote_addr {
                if addr != record.address {
                    return Err(SessionError::AddressMismatch);
                }
            }
        }
        Ok(record.clone())
    }

    /// Drop the session tied to a connection id, e.g. on disconnect.
    pub fn invalidate(&self, connection_id: ConnectionId) {
        if self.sessions.write().remove(&connection_id).is_some() {
            info!(%connection_id, "session invalidated");
        }
    }

    /// Drop every session whose lowercased player name matches.
    pub fn invalidate_player(&self, name: &str) {
        let name = name.to_lowercase();
        self.sessions.write().retain(|_, record| record.name != name);
    }

    /// Remove expired entries; returns the number purged.
    pub fn sweep(&self) -> usize {
        let now = self.clock.epoch_ms();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, record| record.expires_at_ms > now);
        let purged = before - sessions.len();
        if purged > 0 {
            info!(purged, "session sweep purged expired entries");
        }
        purged
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "token_proptests.rs"]
mod proptests;
