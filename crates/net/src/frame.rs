// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel-typed JSON frames (§4.11, §6 "Wire protocol"). Every frame is a
//! JSON object with a `channel` field and a channel-specific payload.

use serde_json::{json, Value};

use crate::error::NetError;

/// Hard ceiling on an encoded frame's byte length. Oversized frames are
/// dropped with a warning and never sent (§4.11, §8 "Oversized-frame
/// suppression").
pub const MAX_FRAME_BYTES: usize = 512 * 1024;

/// An outbound, server-originated frame (`terminal`, `ide`, `gui`, `map`,
/// `time`, `combat`, …).
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    pub channel: String,
    pub payload: Value,
}

impl OutboundFrame {
    pub fn new(channel: impl Into<String>, payload: Value) -> Self {
        Self { channel: channel.into(), payload }
    }

    /// Serialize to wire text, rejecting anything past [`MAX_FRAME_BYTES`].
    pub fn encode(&self) -> Result<String, NetError> {
        let mut body = match &self.payload {
            Value::Object(map) => Value::Object(map.clone()),
            other => json!({ "value": other }),
        };
        body["channel"] = json!(self.channel);
        let text = serde_json::to_string(&body).map_err(|e| NetError::MalformedFrame(e.to_string()))?;
        if text.len() > MAX_FRAME_BYTES {
            return Err(NetError::FrameTooLarge { size: text.len(), limit: MAX_FRAME_BYTES });
        }
        Ok(text)
    }
}

/// A frame arriving from the client.
#[derive(Debug, Clone)]
pub enum InboundFrame {
    /// A raw command line (`channel: "input"`).
    Input { line: String },
    /// A modal response (`channel: "gui"`): submit, button press, or close.
    Gui { payload: Value },
}

impl InboundFrame {
    pub fn parse(text: &str) -> Result<Self, NetError> {
        let value: Value = serde_json::from_str(text).map_err(|e| NetError::MalformedFrame(e.to_string()))?;
        let channel = value.get("channel").and_then(Value::as_str).unwrap_or_default();
        match channel {
            "input" => {
                let line = value.get("line").and_then(Value::as_str).unwrap_or_default().to_string();
                Ok(InboundFrame::Input { line })
            }
            "gui" => Ok(InboundFrame::Gui { payload: value }),
            other => Err(NetError::MalformedFrame(format!("unknown inbound channel '{other}'"))),
        }
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
