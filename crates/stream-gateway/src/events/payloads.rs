//! Event payload definitions

use serde::{Deserialize, Serialize};
use stream_core::{Message, StreamingSessionId, UserId};

/// READY event payload
///
/// Sent once the listener is accepted, before the backlog is replayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    pub session_id: StreamingSessionId,
    pub user_id: UserId,
    pub connection_id: String,

    /// Number of backlog messages that will follow as MESSAGE_HISTORY
    pub message_count: usize,
}

/// MESSAGE_HISTORY and MESSAGE_CREATE payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub session_id: StreamingSessionId,
    pub text: String,
    pub author_id: Option<UserId>,
}

impl MessageEvent {
    #[must_use]
    pub fn new(session_id: StreamingSessionId, message: &Message) -> Self {
        Self {
            session_id,
            text: message.text().to_string(),
            author_id: message.author_id(),
        }
    }
}
