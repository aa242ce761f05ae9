//! Gateway events
//!
//! Dispatch events sent by the gateway to listening clients.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{MessageEvent, ReadyEvent};
