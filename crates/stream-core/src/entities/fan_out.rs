//! Fan-out report - outcome of broadcasting one message

use crate::error::DeliveryError;
use crate::traits::ListenerKey;

use super::Message;

/// Result of one `write_message`: the appended message and per-listener delivery outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutReport {
    pub message: Message,
    pub delivered: usize,
    pub failures: Vec<(ListenerKey, DeliveryError)>,
}

impl FanOutReport {
    /// Create an empty report for `message`
    pub fn new(message: Message) -> Self {
        Self {
            message,
            delivered: 0,
            failures: Vec::new(),
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Listeners whose transport is closed and must be dropped
    pub fn closed_listeners(&self) -> impl Iterator<Item = &ListenerKey> {
        self.failures
            .iter()
            .filter(|(_, err)| err.is_terminal())
            .map(|(key, _)| key)
    }

    pub(crate) fn record(&mut self, key: ListenerKey, outcome: Result<(), DeliveryError>) {
        match outcome {
            Ok(()) => self.delivered += 1,
            Err(err) => self.failures.push((key, err)),
        }
    }
}
