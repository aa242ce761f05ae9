//! WebSocket close codes

use serde::{Deserialize, Serialize};

/// Gateway WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    UnknownError = 4000,
    UnknownOpcode = 4001,
    /// Frame was not valid JSON or the payload had the wrong shape
    DecodeError = 4002,
    /// Listener's user is neither invited nor the owner
    NotInvited = 4003,
    SessionNotFound = 4004,
    /// This connection already listens to the session
    AlreadyListening = 4005,
    /// No heartbeat within the allowed window
    SessionTimeout = 4009,
}

impl CloseCode {
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4000 => Some(Self::UnknownError),
            4001 => Some(Self::UnknownOpcode),
            4002 => Some(Self::DecodeError),
            4003 => Some(Self::NotInvited),
            4004 => Some(Self::SessionNotFound),
            4005 => Some(Self::AlreadyListening),
            4009 => Some(Self::SessionTimeout),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::UnknownOpcode => "Invalid opcode sent",
            Self::DecodeError => "Invalid payload encoding",
            Self::NotInvited => "Not invited to this streaming session",
            Self::SessionNotFound => "Streaming session not found",
            Self::AlreadyListening => "Already listening to this streaming session",
            Self::SessionTimeout => "Session timeout",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnknownError => "UnknownError",
            Self::UnknownOpcode => "UnknownOpcode",
            Self::DecodeError => "DecodeError",
            Self::NotInvited => "NotInvited",
            Self::SessionNotFound => "SessionNotFound",
            Self::AlreadyListening => "AlreadyListening",
            Self::SessionTimeout => "SessionTimeout",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
