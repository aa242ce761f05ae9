//! Heartbeat handler (op 1)

use std::sync::Arc;

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{CloseCode, GatewayMessage};

/// Handles heartbeat messages
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Record the heartbeat and acknowledge it
    ///
    /// `last_sequence` is the last dispatch sequence the client saw, if any.
    pub fn handle(
        connection: &Arc<Connection>,
        last_sequence: Option<u64>,
    ) -> HandlerResult<Option<CloseCode>> {
        connection.record_heartbeat();

        tracing::trace!(
            connection_id = %connection.connection_id(),
            client_seq = ?last_sequence,
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        connection.send(GatewayMessage::heartbeat_ack()).map_err(|e| {
            tracing::warn!(
                connection_id = %connection.connection_id(),
                error = %e,
                "Failed to send heartbeat ACK"
            );
            HandlerError::Internal("Failed to send heartbeat ACK".to_string())
        })?;

        Ok(None)
    }
}
