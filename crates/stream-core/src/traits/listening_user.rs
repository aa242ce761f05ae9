//! Listening user capability
//!
//! Anything that can be addressed by a user id and accept messages may be
//! connected to a streaming session. Session code depends only on this trait,
//! never on a concrete transport.

use std::fmt;

use crate::entities::Message;
use crate::error::DeliveryError;
use crate::value_objects::UserId;

/// A participant connected to a streaming session
///
/// Implementations must never block: `forward` is called during fan-out and
/// every other listener (and the writer) waits for it to return.
pub trait ListeningUser: Send + Sync {
    /// User this listener acts for
    fn user_id(&self) -> UserId;

    /// Distinguishes several connections of the same user
    fn connection_id(&self) -> &str;

    /// Direct delivery outside the live fan-out (e.g. backlog replay)
    fn receive_message(&self, message: Message) -> Result<(), DeliveryError>;

    /// Live fan-out entry point, called once per written message
    fn forward(&self, message: Message) -> Result<(), DeliveryError>;

    /// Identity used for "already connected" checks
    fn key(&self) -> ListenerKey {
        ListenerKey::new(self.user_id(), self.connection_id())
    }
}

/// Identity of one connected listener: `(user_id, connection_id)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerKey {
    pub user_id: UserId,
    pub connection_id: String,
}

impl ListenerKey {
    /// Create a new ListenerKey
    pub fn new(user_id: UserId, connection_id: impl Into<String>) -> Self {
        Self {
            user_id,
            connection_id: connection_id.into(),
        }
    }
}

impl fmt::Display for ListenerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.connection_id)
    }
}
