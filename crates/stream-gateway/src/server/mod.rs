//! Gateway server setup
//!
//! Builds the router that serves the REST API and the `/gateway` WebSocket.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use stream_common::{AppConfig, AppError};
use stream_service::ServiceContextBuilder;
use stream_store::InMemoryStreamingSessionRepository;
use tokio::net::TcpListener;

use crate::connection::ConnectionManager;

/// REST routes plus the WebSocket endpoint
pub fn create_router() -> Router<GatewayState> {
    crate::routes::create_router().route("/gateway", get(gateway_handler))
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    crate::middleware::apply_middleware(create_router()).with_state(state)
}

/// Wire the in-memory repository and services into a `GatewayState`
pub fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    let session_repo = Arc::new(InMemoryStreamingSessionRepository::new());

    let service_context = ServiceContextBuilder::new()
        .session_repo(session_repo)
        .streaming_config(&config.streaming)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let connection_manager = ConnectionManager::new_shared();

    tracing::info!(
        listener_buffer_size = config.streaming.listener_buffer_size,
        heartbeat_interval_ms = config.streaming.heartbeat_interval_ms,
        "Gateway state initialized"
    );

    Ok(GatewayState::new(service_context, connection_manager, config))
}

/// Serve `app` on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Bind `addr` and serve `app`
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    serve(listener, app).await
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.gateway.address();
    let addr = tokio::net::lookup_host(&address)
        .await
        .map_err(|e| AppError::Config(format!("Invalid gateway address {address}: {e}")))?
        .next()
        .ok_or_else(|| AppError::Config(format!("Gateway address {address} did not resolve")))?;

    let state = create_gateway_state(config)?;
    let app = create_app(state);

    run_server(app, addr).await
}
