//! REST route definitions

mod health;
mod sessions;

use axum::{routing::get, routing::post, Router};

use crate::server::GatewayState;

/// Greeting, health, and streaming session routes
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/", get(health::greeting))
        .route("/health", get(health::health_check))
        .merge(session_routes())
}

fn session_routes() -> Router<GatewayState> {
    Router::new()
        .route("/sessions", post(sessions::create_session).get(sessions::list_owned_sessions))
        .route("/sessions/:session_id", get(sessions::get_session))
        .route("/sessions/:session_id/invites", post(sessions::invite_accounts))
        .route(
            "/sessions/:session_id/messages",
            post(sessions::write_message).get(sessions::list_messages),
        )
}
