//! Integration test utilities for the streaming gateway
//!
//! Helpers for running end-to-end tests against the REST API and the
//! WebSocket gateway.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
