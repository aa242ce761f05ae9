//! Op code handlers
//!
//! Routes incoming WebSocket messages by operation code.

mod error;
mod heartbeat;
mod listen;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use listen::{detach_all, ListenHandler, UnlistenHandler};

use std::sync::Arc;

use crate::connection::Connection;
use crate::protocol::{CloseCode, GatewayMessage, OpCode};
use crate::server::GatewayState;

/// Dispatch incoming client messages to the matching handler
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle one client message
    ///
    /// `Ok(Some(code))` asks the caller to close the socket with `code`.
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        if !message.op.is_client_op() {
            tracing::warn!(
                connection_id = %connection.connection_id(),
                op = %message.op,
                "Received server-only op code from client"
            );
            return Ok(Some(CloseCode::UnknownOpcode));
        }

        match message.op {
            OpCode::Heartbeat => {
                let seq = message.as_heartbeat_seq().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Heartbeat payload".to_string())
                })?;

                HeartbeatHandler::handle(connection, seq)
            }
            OpCode::Listen => {
                let payload = message.as_listen().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Listen payload".to_string())
                })?;

                ListenHandler::handle(state, connection, payload).await
            }
            OpCode::Unlisten => {
                let payload = message.as_unlisten().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Unlisten payload".to_string())
                })?;

                UnlistenHandler::handle(state, connection, payload).await
            }
            _ => {
                tracing::error!(op = %message.op, "Unhandled client op code");
                Ok(Some(CloseCode::UnknownOpcode))
            }
        }
    }
}
