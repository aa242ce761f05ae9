//! Gateway operation codes

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gateway operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Server dispatches an event to the client (server only)
    Dispatch = 0,
    /// Keep the connection alive (client only)
    Heartbeat = 1,
    /// Start listening to a streaming session (client only)
    Listen = 2,
    /// Stop listening to a streaming session (client only)
    Unlisten = 3,
    /// Sent on connect with the heartbeat interval (server only)
    Hello = 10,
    /// Heartbeat acknowledged (server only)
    HeartbeatAck = 11,
}

impl OpCode {
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Dispatch),
            1 => Some(Self::Heartbeat),
            2 => Some(Self::Listen),
            3 => Some(Self::Unlisten),
            10 => Some(Self::Hello),
            11 => Some(Self::HeartbeatAck),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this op code can be sent by the client
    #[must_use]
    pub const fn is_client_op(self) -> bool {
        matches!(self, Self::Heartbeat | Self::Listen | Self::Unlisten)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dispatch => "Dispatch",
            Self::Heartbeat => "Heartbeat",
            Self::Listen => "Listen",
            Self::Unlisten => "Unlisten",
            Self::Hello => "Hello",
            Self::HeartbeatAck => "HeartbeatAck",
        }
    }
}

impl Serialize for OpCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid op code: {value}")))
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}
