//! In-memory listener used by unit tests

use parking_lot::Mutex;
use std::sync::Arc;

use crate::entities::Message;
use crate::error::DeliveryError;
use crate::traits::ListeningUser;
use crate::value_objects::UserId;

/// Listener that records what it was given, optionally failing every delivery
pub(crate) struct RecordingListener {
    user_id: UserId,
    connection_id: String,
    fail_with: Option<DeliveryError>,
    forwarded: Mutex<Vec<Message>>,
    received: Mutex<Vec<Message>>,
}

impl RecordingListener {
    pub(crate) fn shared(user_id: UserId, connection_id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            user_id,
            connection_id: connection_id.into(),
            fail_with: None,
            forwarded: Mutex::new(Vec::new()),
            received: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing(
        user_id: UserId,
        connection_id: impl Into<String>,
        error: DeliveryError,
    ) -> Arc<Self> {
        Arc::new(Self {
            user_id,
            connection_id: connection_id.into(),
            fail_with: Some(error),
            forwarded: Mutex::new(Vec::new()),
            received: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn forwarded(&self) -> Vec<Message> {
        self.forwarded.lock().clone()
    }

    pub(crate) fn received(&self) -> Vec<Message> {
        self.received.lock().clone()
    }
}

impl ListeningUser for RecordingListener {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn connection_id(&self) -> &str {
        &self.connection_id
    }

    fn receive_message(&self, message: Message) -> Result<(), DeliveryError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.received.lock().push(message);
        Ok(())
    }

    fn forward(&self, message: Message) -> Result<(), DeliveryError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.forwarded.lock().push(message);
        Ok(())
    }
}
