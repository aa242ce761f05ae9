//! Gateway message format
//!
//! Every frame on the socket is a JSON object `{op, t, s, d}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{CloseCode, HelloPayload, ListenPayload, OpCode, UnlistenPayload};

/// Gateway message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

/// Why an incoming frame could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown op code: {0}")]
    UnknownOpcode(u64),

    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl DecodeError {
    #[must_use]
    pub fn close_code(&self) -> CloseCode {
        match self {
            Self::UnknownOpcode(_) => CloseCode::UnknownOpcode,
            Self::Malformed(_) => CloseCode::DecodeError,
        }
    }
}

impl GatewayMessage {
    // === Server Messages ===

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(payload: &HelloPayload) -> Self {
        Self {
            op: OpCode::Hello,
            t: None,
            s: None,
            d: serde_json::to_value(payload).ok(),
        }
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self {
            op: OpCode::HeartbeatAck,
            t: None,
            s: None,
            d: None,
        }
    }

    // === Parsing Client Messages ===

    /// Parse a Listen payload (op=2)
    pub fn as_listen(&self) -> Option<ListenPayload> {
        self.payload_for(OpCode::Listen)
    }

    /// Parse an Unlisten payload (op=3)
    pub fn as_unlisten(&self) -> Option<UnlistenPayload> {
        self.payload_for(OpCode::Unlisten)
    }

    /// Parse the heartbeat sequence number (op=1)
    pub fn as_heartbeat_seq(&self) -> Option<Option<u64>> {
        if self.op != OpCode::Heartbeat {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_u64))
    }

    fn payload_for<T: serde::de::DeserializeOwned>(&self, op: OpCode) -> Option<T> {
        if self.op != op {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    // === Utilities ===

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a client frame, telling unknown op codes apart from malformed JSON
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(json)?;

        if let Some(op) = value.get("op").and_then(Value::as_u64) {
            let known = u8::try_from(op).ok().and_then(OpCode::from_u8).is_some();
            if !known {
                return Err(DecodeError::UnknownOpcode(op));
            }
        }

        Ok(serde_json::from_value(value)?)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
