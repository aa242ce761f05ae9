//! User entity - an account that can own streaming sessions

use serde::{Deserialize, Serialize};

use super::StreamingSession;
use crate::value_objects::UserId;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
}

impl User {
    /// Create a new user with a fresh id
    pub fn create(username: impl Into<String>) -> Self {
        Self::with_id(UserId::generate(), username)
    }

    /// Create a user with an externally supplied id (rehydration)
    pub fn with_id(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }

    #[inline]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[inline]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Start a new streaming session owned by this user
    pub fn create_streaming_session(&self) -> StreamingSession {
        StreamingSession::create(self.id)
    }
}
