//! # stream-gateway
//!
//! HTTP API and WebSocket gateway for streaming sessions.
//!
//! REST routes create sessions, invite accounts, and write messages. The
//! `/gateway` WebSocket lets invited users listen to a session and receive
//! every message the owner writes.

pub mod connection;
pub mod events;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod protocol;
pub mod response;
pub mod routes;
pub mod server;

pub use server::{create_app, create_gateway_state, run, run_server, serve, GatewayState};
