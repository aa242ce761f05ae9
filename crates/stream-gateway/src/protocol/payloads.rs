//! Client and server payload definitions

use serde::{Deserialize, Serialize};
use stream_core::{StreamingSessionId, UserId};

/// Payload for op 10 (Hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

/// Payload for op 2 (Listen)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenPayload {
    /// Identity the connection listens as
    pub user_id: UserId,
    pub session_id: StreamingSessionId,
}

/// Payload for op 3 (Unlisten)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlistenPayload {
    pub session_id: StreamingSessionId,
}
