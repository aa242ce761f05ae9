//! Connection manager
//!
//! Registry of live WebSocket connections backed by `DashMap`.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use stream_core::StreamingSessionId;
use tokio::sync::mpsc;

use super::{Connection, Outbound};

/// Tracks every open connection and which sessions they listen to
#[derive(Default)]
pub struct ConnectionManager {
    /// Active connections by connection ID
    connections: DashMap<String, Arc<Connection>>,

    /// Streaming session ID to connection IDs
    session_connections: DashMap<StreamingSessionId, HashSet<String>>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection under a fresh ID
    pub fn add_connection(&self, sender: mpsc::Sender<Outbound>) -> Arc<Connection> {
        let connection_id = uuid::Uuid::new_v4().to_string();
        let connection = Connection::new(connection_id.clone(), sender);
        self.connections.insert(connection_id.clone(), Arc::clone(&connection));

        tracing::debug!(connection_id = %connection_id, "Connection added");

        connection
    }

    /// Remove a connection and every session mapping that points at it
    pub fn remove_connection(&self, connection_id: &str) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(connection_id)?;

        for (session_id, _) in connection.listening() {
            self.untrack_listen(session_id, connection_id);
        }

        tracing::debug!(connection_id = %connection_id, "Connection removed");

        Some(connection)
    }

    pub fn get_connection(&self, connection_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(connection_id).map(|r| Arc::clone(r.value()))
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn track_listen(&self, session_id: StreamingSessionId, connection_id: &str) {
        self.session_connections
            .entry(session_id)
            .or_default()
            .insert(connection_id.to_string());

        tracing::trace!(session_id = %session_id, connection_id = %connection_id, "Listen tracked");
    }

    pub fn untrack_listen(&self, session_id: StreamingSessionId, connection_id: &str) {
        // Drop the entry once no connection listens
        if let Some(mut ids) = self.session_connections.get_mut(&session_id) {
            ids.remove(connection_id);
        }
        self.session_connections
            .remove_if(&session_id, |_, ids| ids.is_empty());
    }

    /// Number of connections listening to a session
    pub fn session_connection_count(&self, session_id: StreamingSessionId) -> usize {
        self.session_connections
            .get(&session_id)
            .map_or(0, |ids| ids.len())
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("sessions", &self.session_connections.len())
            .finish()
    }
}
