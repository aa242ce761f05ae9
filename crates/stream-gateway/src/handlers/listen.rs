//! Listen (op 2) and Unlisten (op 3) handlers

use std::sync::Arc;

use stream_core::{DomainError, ListenerKey, StreamingSessionId};
use stream_service::{ConnectOutcome, ServiceError, SessionService};

use super::{HandlerError, HandlerResult};
use crate::connection::{Connection, ConnectionListener};
use crate::events::{GatewayEventType, ReadyEvent};
use crate::protocol::{CloseCode, ListenPayload, UnlistenPayload};
use crate::server::GatewayState;

/// Attaches a connection to a streaming session as a listener
pub struct ListenHandler;

impl ListenHandler {
    /// Start listening
    ///
    /// READY goes out first, then the backlog as MESSAGE_HISTORY, then live
    /// MESSAGE_CREATE events.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: ListenPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        let ListenPayload { user_id, session_id } = payload;

        if connection.is_listening(session_id) {
            tracing::warn!(
                connection_id = %connection.connection_id(),
                session_id = %session_id,
                "Listen sent twice for the same session"
            );
            return Err(HandlerError::AlreadyListening);
        }

        let session = state
            .service_context()
            .session_repo()
            .find_by_id(session_id)
            .await
            .map_err(|e| match e {
                DomainError::StreamingSessionNotFound(_) => HandlerError::SessionNotFound,
                other => HandlerError::Service(other.into()),
            })?;

        if !session.is_invited(user_id) {
            tracing::info!(
                connection_id = %connection.connection_id(),
                session_id = %session_id,
                user_id = %user_id,
                "Listen rejected: user not invited"
            );
            return Err(HandlerError::NotInvited);
        }

        let ready = ReadyEvent {
            session_id,
            user_id,
            connection_id: connection.connection_id().to_string(),
            message_count: session.with_session(|s| s.messages().len()),
        };
        let ready = serde_json::to_value(&ready).map_err(|e| HandlerError::Internal(e.to_string()))?;
        connection
            .dispatch(GatewayEventType::Ready, ready)
            .map_err(|e| HandlerError::Internal(e.to_string()))?;

        let listener = Arc::new(ConnectionListener::new(Arc::clone(connection), user_id, session_id));
        let outcome = SessionService::new(state.service_context())
            .connect_listener(session_id, listener)
            .await?;

        match outcome {
            ConnectOutcome::Connected { replayed } => {
                connection.track_listen(session_id, user_id);
                state
                    .connection_manager()
                    .track_listen(session_id, connection.connection_id());

                tracing::info!(
                    connection_id = %connection.connection_id(),
                    session_id = %session_id,
                    user_id = %user_id,
                    replayed,
                    "Listening"
                );
                Ok(None)
            }
            ConnectOutcome::AlreadyConnected => Err(HandlerError::AlreadyListening),
        }
    }
}

/// Detaches a connection from a streaming session
pub struct UnlistenHandler;

impl UnlistenHandler {
    /// Stop listening; a session the connection does not listen to is ignored
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: UnlistenPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        let session_id = payload.session_id;

        if detach(state, connection, session_id).await? {
            tracing::info!(
                connection_id = %connection.connection_id(),
                session_id = %session_id,
                "Stopped listening"
            );
        } else {
            tracing::debug!(
                connection_id = %connection.connection_id(),
                session_id = %session_id,
                "Unlisten for a session that was not listened to"
            );
        }

        Ok(None)
    }
}

/// Disconnect every listener a closing connection still has
pub async fn detach_all(state: &GatewayState, connection: &Arc<Connection>) {
    for (session_id, _) in connection.listening() {
        if let Err(e) = detach(state, connection, session_id).await {
            tracing::warn!(
                connection_id = %connection.connection_id(),
                session_id = %session_id,
                error = %e,
                "Failed to detach listener"
            );
        }
    }
}

async fn detach(
    state: &GatewayState,
    connection: &Arc<Connection>,
    session_id: StreamingSessionId,
) -> HandlerResult<bool> {
    let Some(user_id) = connection.untrack_listen(session_id) else {
        return Ok(false);
    };
    state
        .connection_manager()
        .untrack_listen(session_id, connection.connection_id());

    let key = ListenerKey::new(user_id, connection.connection_id());
    match SessionService::new(state.service_context())
        .disconnect_listener(session_id, &key)
        .await
    {
        Ok(_) => Ok(true),
        // A session that vanished has no listener left to remove
        Err(ServiceError::Domain(DomainError::StreamingSessionNotFound(_))) => Ok(true),
        Err(e) => Err(e.into()),
    }
}
