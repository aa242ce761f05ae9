//! Delivery errors - failures reported by a listener transport

use thiserror::Error;

/// Failure to hand a message to one listener
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The listener's transport is gone; it will never accept messages again
    #[error("listener transport closed")]
    Closed,

    /// The listener's outbound buffer is full; this message was dropped
    #[error("listener buffer full")]
    Backpressure,

    /// Any other transport failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl DeliveryError {
    /// Whether the listener should be disconnected after this failure
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
