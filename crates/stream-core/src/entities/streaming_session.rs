//! StreamingSession aggregate - owner broadcast channel with an invite list
//!
//! The session is the sole authority over its membership and message log:
//! - only the owner may write messages,
//! - only invited users (or the owner) may connect as listeners,
//! - the log is append-only and keeps write order.
//!
//! Fan-out is synchronous. Every connected listener's `forward` is called once
//! per message and `write_message` returns only after all of them returned.
//! A failed delivery never aborts the fan-out; listeners whose transport is
//! closed are disconnected afterwards.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::{FanOutReport, Message};
use crate::error::DomainError;
use crate::traits::{ListenerKey, ListeningUser};
use crate::value_objects::{StreamingSessionId, UserId};

/// Streaming session aggregate root
pub struct StreamingSession {
    id: StreamingSessionId,
    owner_id: UserId,
    created_at: DateTime<Utc>,
    messages: Vec<Message>,
    invited_user_ids: HashSet<UserId>,
    listeners: Vec<Arc<dyn ListeningUser>>,
}

impl StreamingSession {
    /// Create an empty session owned by `owner_id`
    pub fn create(owner_id: UserId) -> Self {
        Self {
            id: StreamingSessionId::generate(),
            owner_id,
            created_at: Utc::now(),
            messages: Vec::new(),
            invited_user_ids: HashSet::new(),
            listeners: Vec::new(),
        }
    }

    /// Create a session whose log is pre-seeded with `messages`, in order
    ///
    /// Used to reconstruct a session from stored state; no listeners are attached.
    pub fn create_with_messages(
        owner_id: UserId,
        messages: impl IntoIterator<Item = Message>,
    ) -> Self {
        let mut session = Self::create(owner_id);
        session.messages.extend(messages);
        session
    }

    // === Accessors ===

    #[inline]
    pub fn id(&self) -> StreamingSessionId {
        self.id
    }

    #[inline]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The message log in write order
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Explicitly invited users (the owner is implicit and not listed)
    #[inline]
    pub fn invited_user_ids(&self) -> &HashSet<UserId> {
        &self.invited_user_ids
    }

    /// Number of currently connected listeners
    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Keys of all connected listeners
    pub fn listener_keys(&self) -> Vec<ListenerKey> {
        self.listeners.iter().map(|l| l.key()).collect()
    }

    // === Membership ===

    /// Invite a user. Returns `false` if already invited.
    ///
    /// No authorization happens here; callers check ownership first.
    pub fn invite(&mut self, user_id: UserId) -> bool {
        self.invited_user_ids.insert(user_id)
    }

    /// Invite several users, returning how many were newly added
    pub fn invite_all(&mut self, user_ids: impl IntoIterator<Item = UserId>) -> usize {
        user_ids
            .into_iter()
            .filter(|id| self.invited_user_ids.insert(*id))
            .count()
    }

    /// Check if a user may connect: invited or owner
    #[inline]
    pub fn is_invited(&self, user_id: UserId) -> bool {
        self.owner_id == user_id || self.invited_user_ids.contains(&user_id)
    }

    /// Check if a listener with this key is connected
    pub fn is_connected(&self, key: &ListenerKey) -> bool {
        self.listeners.iter().any(|l| l.key() == *key)
    }

    /// Connect a listener
    ///
    /// Returns `Ok(false)` without touching the set when an equal listener is
    /// already connected. No backlog is replayed.
    pub fn connect(&mut self, listener: Arc<dyn ListeningUser>) -> Result<bool, DomainError> {
        if !self.is_invited(listener.user_id()) {
            return Err(DomainError::NotInvited);
        }

        if self.is_connected(&listener.key()) {
            return Ok(false);
        }

        self.listeners.push(listener);
        Ok(true)
    }

    /// Disconnect a listener, returning whether it was connected
    pub fn disconnect(&mut self, key: &ListenerKey) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.key() != *key);
        self.listeners.len() != before
    }

    // === Messages ===

    /// Write a message as `user_id` and fan it out to every connected listener
    pub fn write_message(
        &mut self,
        user_id: UserId,
        text: impl Into<String>,
    ) -> Result<FanOutReport, DomainError> {
        let (message, listeners) = self.record_message(user_id, text)?;
        let report = Self::deliver(message, &listeners);

        for key in report.closed_listeners() {
            self.disconnect(key);
        }

        Ok(report)
    }

    /// Authorize and append a message, returning it with a snapshot of the listeners
    pub(crate) fn record_message(
        &mut self,
        user_id: UserId,
        text: impl Into<String>,
    ) -> Result<(Message, Vec<Arc<dyn ListeningUser>>), DomainError> {
        if user_id != self.owner_id {
            return Err(DomainError::NotSessionOwner);
        }

        let message = Message::new(text, user_id);
        self.messages.push(message.clone());

        Ok((message, self.listeners.clone()))
    }

    /// Forward a fresh copy of `message` to each listener
    pub(crate) fn deliver(message: Message, listeners: &[Arc<dyn ListeningUser>]) -> FanOutReport {
        let mut report = FanOutReport::new(message);

        for listener in listeners {
            let outcome = listener.forward(report.message.clone());
            report.record(listener.key(), outcome);
        }

        report
    }
}

impl fmt::Debug for StreamingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingSession")
            .field("id", &self.id)
            .field("owner_id", &self.owner_id)
            .field("messages", &self.messages.len())
            .field("invited_user_ids", &self.invited_user_ids)
            .field("listeners", &self.listener_keys())
            .finish()
    }
}
