//! Gateway event types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event names sent in the `t` field of dispatch messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEventType {
    /// Sent after a successful Listen, before any backlog
    Ready,
    /// A message written before the listener connected
    MessageHistory,
    /// A message written while the listener is connected
    MessageCreate,
}

impl GatewayEventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::MessageHistory => "MESSAGE_HISTORY",
            Self::MessageCreate => "MESSAGE_CREATE",
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GatewayEventType> for String {
    fn from(event: GatewayEventType) -> Self {
        event.as_str().to_string()
    }
}
