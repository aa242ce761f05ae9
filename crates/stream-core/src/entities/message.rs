//! Message value - text written into a streaming session

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Immutable message value
///
/// Equality is structural: two messages with the same text and author are
/// indistinguishable, and a session log may hold both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    text: String,
    author_id: Option<UserId>,
}

impl Message {
    /// Create a message written by `author_id`
    pub fn new(text: impl Into<String>, author_id: UserId) -> Self {
        Self {
            text: text.into(),
            author_id: Some(author_id),
        }
    }

    /// Create a message without an author
    pub fn anonymous(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author_id: None,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn author_id(&self) -> Option<UserId> {
        self.author_id
    }

    /// Check if `user_id` wrote this message
    #[inline]
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == Some(user_id)
    }

    /// Number of characters in the text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
