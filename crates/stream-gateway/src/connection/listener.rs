//! Listener adapter
//!
//! Plugs a WebSocket connection into a streaming session as one of its
//! listeners.

use std::sync::Arc;

use stream_core::{DeliveryError, ListeningUser, Message, StreamingSessionId, UserId};

use super::Connection;
use crate::events::{GatewayEventType, MessageEvent};

/// A connection listening to one session as one user
#[derive(Debug, Clone)]
pub struct ConnectionListener {
    connection: Arc<Connection>,
    user_id: UserId,
    session_id: StreamingSessionId,
}

impl ConnectionListener {
    pub fn new(connection: Arc<Connection>, user_id: UserId, session_id: StreamingSessionId) -> Self {
        Self {
            connection,
            user_id,
            session_id,
        }
    }

    fn deliver(&self, event: GatewayEventType, message: &Message) -> Result<(), DeliveryError> {
        let payload = serde_json::to_value(MessageEvent::new(self.session_id, message))
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        self.connection.dispatch(event, payload)
    }
}

impl ListeningUser for ConnectionListener {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn connection_id(&self) -> &str {
        self.connection.connection_id()
    }

    fn receive_message(&self, message: Message) -> Result<(), DeliveryError> {
        self.deliver(GatewayEventType::MessageHistory, &message)
    }

    fn forward(&self, message: Message) -> Result<(), DeliveryError> {
        self.deliver(GatewayEventType::MessageCreate, &message)
    }
}
