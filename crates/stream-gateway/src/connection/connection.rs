//! Individual WebSocket connection
//!
//! Everything written to the socket goes through a bounded channel drained by
//! the connection's send task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use stream_core::{DeliveryError, StreamingSessionId, UserId};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::events::GatewayEventType;
use crate::protocol::{CloseCode, GatewayMessage};

/// Item queued for the send task
#[derive(Debug, Clone)]
pub enum Outbound {
    Message(GatewayMessage),
    /// Write a close frame and stop
    Close(CloseCode),
}

/// A single WebSocket connection
pub struct Connection {
    connection_id: String,

    sender: mpsc::Sender<Outbound>,

    /// Last dispatch sequence number. Held while enqueueing so sequence
    /// numbers reach the socket in order.
    sequence: Mutex<u64>,

    last_heartbeat: RwLock<Instant>,

    /// Sessions this connection listens to, with the identity it listens as
    listening: RwLock<HashMap<StreamingSessionId, UserId>>,

    created_at: Instant,
}

impl Connection {
    pub fn new(connection_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            connection_id,
            sender,
            sequence: Mutex::new(0),
            last_heartbeat: RwLock::new(Instant::now()),
            listening: RwLock::new(HashMap::new()),
            created_at: Instant::now(),
        })
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn current_sequence(&self) -> u64 {
        *self.sequence.lock()
    }

    /// Queue a dispatch event without waiting
    ///
    /// A full buffer drops the event and reports `Backpressure`; a finished
    /// send task reports `Closed`.
    pub fn dispatch(&self, event: GatewayEventType, data: Value) -> Result<(), DeliveryError> {
        let mut sequence = self.sequence.lock();
        let next = *sequence + 1;

        match self
            .sender
            .try_send(Outbound::Message(GatewayMessage::dispatch(event, next, data)))
        {
            Ok(()) => {
                *sequence = next;
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(DeliveryError::Backpressure),
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }

    /// Queue a non-dispatch message (Hello, Heartbeat ACK)
    pub fn send(&self, message: GatewayMessage) -> Result<(), DeliveryError> {
        self.sender
            .try_send(Outbound::Message(message))
            .map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::Backpressure,
                TrySendError::Closed(_) => DeliveryError::Closed,
            })
    }

    /// Ask the send task to write a close frame
    ///
    /// Waits for buffer space so the close frame is not lost behind queued events.
    pub async fn close(&self, code: CloseCode) {
        if self.sender.send(Outbound::Close(code)).await.is_err() {
            tracing::trace!(connection_id = %self.connection_id, "Close after send task ended");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.write() = Instant::now();
    }

    pub fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.read().elapsed()
    }

    /// Remember that this connection listens to `session_id` as `user_id`
    pub fn track_listen(&self, session_id: StreamingSessionId, user_id: UserId) {
        self.listening.write().insert(session_id, user_id);
    }

    /// Forget a session, returning the identity it was listened to as
    pub fn untrack_listen(&self, session_id: StreamingSessionId) -> Option<UserId> {
        self.listening.write().remove(&session_id)
    }

    pub fn is_listening(&self, session_id: StreamingSessionId) -> bool {
        self.listening.read().contains_key(&session_id)
    }

    /// Every session this connection listens to
    pub fn listening(&self) -> Vec<(StreamingSessionId, UserId)> {
        self.listening.read().iter().map(|(s, u)| (*s, *u)).collect()
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("connection_id", &self.connection_id)
            .field("sequence", &self.current_sequence())
            .field("listening", &self.listening.read().len())
            .field("created_at", &self.created_at)
            .finish()
    }
}
