//! Connection management
//!
//! WebSocket connections, the listener adapter that plugs a connection into a
//! streaming session, and the registry of live connections.

mod connection;
mod listener;
mod manager;

pub use connection::{Connection, Outbound};
pub use listener::ConnectionListener;
pub use manager::ConnectionManager;
