//! Response DTOs for API endpoints
//!
//! Ids are serialized as strings.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Session summary
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub invited_user_ids: Vec<String>,
    pub message_count: usize,
    pub listener_count: usize,
}

/// A message in a session log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub text: String,
    /// `None` for anonymous messages
    pub author_id: Option<String>,
}

/// Result of writing a message
#[derive(Debug, Clone, Serialize)]
pub struct WriteMessageResponse {
    pub message: MessageResponse,
    pub delivered: usize,
    pub failed: usize,
}

/// Result of an invite
#[derive(Debug, Clone, Serialize)]
pub struct InviteResponse {
    pub session_id: String,
    /// Users newly added by this call
    pub invited: usize,
}
