//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate`.

use serde::Deserialize;
use stream_core::UserId;
use validator::Validate;

/// Invite one or more users to a session
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteRequest {
    #[validate(length(min = 1, max = 100, message = "user_ids must contain 1-100 entries"))]
    pub user_ids: Vec<UserId>,
}

/// Write a message to a session
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WriteMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub text: String,
}
