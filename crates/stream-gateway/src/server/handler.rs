//! WebSocket handler
//!
//! One task reads client frames, one drains the outbound channel into the
//! socket, and one watches for missed heartbeats. The first to finish ends
//! the connection.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};

use crate::connection::{Connection, Outbound};
use crate::handlers::{detach_all, MessageDispatcher};
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;

/// How long the send task gets to flush a close frame
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let streaming = state.config().streaming.clone();
    let heartbeat_interval = Duration::from_millis(streaming.heartbeat_interval_ms);

    let (tx, mut rx) = mpsc::channel::<Outbound>(streaming.listener_buffer_size);
    let connection = state.connection_manager().add_connection(tx);
    let connection_id = connection.connection_id().to_string();

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    let hello = GatewayMessage::hello(&HelloPayload::with_interval(streaming.heartbeat_interval_ms));
    if let Ok(json) = hello.to_json() {
        if ws_sink.send(Message::Text(json)).await.is_err() {
            tracing::warn!(connection_id = %connection_id, "Failed to send Hello message");
            cleanup_connection(&state, &connection).await;
            return;
        }
    }

    let state_recv = state.clone();
    let connection_recv = Arc::clone(&connection);
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            let id = connection_recv.connection_id();
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(close_code) =
                        handle_text_message(&state_recv, &connection_recv, &text).await
                    {
                        return Some(close_code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(connection_id = %id, "Binary messages not supported");
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    tracing::trace!(connection_id = %id, "Ping/pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %id, "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(connection_id = %id, error = %e, "WebSocket error");
                    return None;
                }
            }
        }
        None
    });

    let connection_id_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            let frame = match outbound {
                Outbound::Message(msg) => match msg.to_json() {
                    Ok(json) => Message::Text(json),
                    Err(e) => {
                        tracing::error!(connection_id = %connection_id_send, error = %e, "Failed to encode message");
                        continue;
                    }
                },
                Outbound::Close(code) => {
                    let close = Message::Close(Some(CloseFrame {
                        code: code.as_u16(),
                        reason: code.description().into(),
                    }));
                    if ws_sink.send(close).await.is_err() {
                        tracing::debug!(connection_id = %connection_id_send, "Close frame not delivered");
                    }
                    break;
                }
            };

            if ws_sink.send(frame).await.is_err() {
                tracing::warn!(connection_id = %connection_id_send, "Failed to send message to WebSocket");
                break;
            }
        }

        // Later dispatches report Closed
        rx.close();
        let _ = ws_sink.close().await;
    });

    let connection_hb = Arc::clone(&connection);
    let mut heartbeat_task = tokio::spawn(async move {
        let allowed = heartbeat_interval * 2;
        let mut check_interval = interval((heartbeat_interval / 2).max(Duration::from_millis(1)));

        loop {
            check_interval.tick().await;

            let time_since = connection_hb.time_since_heartbeat();
            if time_since > allowed {
                tracing::warn!(
                    connection_id = %connection_hb.connection_id(),
                    time_since_ms = time_since.as_millis(),
                    "Connection timed out (no heartbeat)"
                );
                return CloseCode::SessionTimeout;
            }
        }
    });

    let (close_code, send_finished) = tokio::select! {
        result = &mut recv_task => (result.ok().flatten(), false),
        _ = &mut send_task => (None, true),
        result = &mut heartbeat_task => (result.ok(), false),
    };

    recv_task.abort();
    heartbeat_task.abort();

    cleanup_connection(&state, &connection).await;

    if let Some(code) = close_code {
        tracing::debug!(connection_id = %connection_id, close_code = %code, "Closing connection");

        if !send_finished {
            let flushed = timeout(CLOSE_GRACE, async {
                connection.close(code).await;
                let _ = (&mut send_task).await;
            })
            .await;

            if flushed.is_err() {
                tracing::debug!(connection_id = %connection_id, "Close frame flush timed out");
            }
        }
    }

    send_task.abort();
}

/// Decode and dispatch one text frame; `Err` carries the close code to send
async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let message = GatewayMessage::from_json(text).map_err(|e| {
        tracing::debug!(
            connection_id = %connection.connection_id(),
            error = %e,
            "Failed to parse message"
        );
        e.close_code()
    })?;

    tracing::trace!(
        connection_id = %connection.connection_id(),
        op = %message.op,
        "Received message"
    );

    match MessageDispatcher::dispatch(state, connection, message).await {
        Ok(Some(close_code)) => Err(close_code),
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::warn!(
                connection_id = %connection.connection_id(),
                error = %e,
                "Handler error"
            );
            Err(e.to_close_code())
        }
    }
}

/// Detach every listener this connection registered and forget it
async fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    tracing::info!(
        connection_id = %connection.connection_id(),
        age_ms = connection.age().as_millis(),
        "Cleaning up connection"
    );

    detach_all(state, connection).await;
    state
        .connection_manager()
        .remove_connection(connection.connection_id());
}
