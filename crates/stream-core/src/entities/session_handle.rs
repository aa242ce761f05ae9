//! Shared session handle - serializes access to one streaming session
//!
//! Every mutation goes through a single state mutex. `write_message` appends
//! under that lock, takes a snapshot of the listeners, and releases it before
//! calling `forward`. A separate delivery lock is held from before the append
//! until the fan-out finishes, so each listener sees messages in log order.
//! A listener connected while a fan-out is in flight may or may not receive
//! that message.
//!
//! Lock order is delivery then state.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::{FanOutReport, Message, StreamingSession};
use crate::error::DomainError;
use crate::traits::{ListenerKey, ListeningUser};
use crate::value_objects::{StreamingSessionId, UserId};

/// Cloneable, thread-safe handle to a streaming session
#[derive(Clone)]
pub struct SessionHandle {
    id: StreamingSessionId,
    owner_id: UserId,
    inner: Arc<Mutex<StreamingSession>>,
    delivery: Arc<Mutex<()>>,
}

impl SessionHandle {
    /// Wrap a session for shared use
    pub fn new(session: StreamingSession) -> Self {
        Self {
            id: session.id(),
            owner_id: session.owner_id(),
            inner: Arc::new(Mutex::new(session)),
            delivery: Arc::new(Mutex::new(())),
        }
    }

    #[inline]
    pub fn id(&self) -> StreamingSessionId {
        self.id
    }

    #[inline]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Run `f` with read access to the session under the lock
    ///
    /// Do not call back into this handle from `f`.
    pub fn with_session<R>(&self, f: impl FnOnce(&StreamingSession) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Copy of the message log
    pub fn messages(&self) -> Vec<Message> {
        self.inner.lock().messages().to_vec()
    }

    /// Copy of the explicit invite set
    pub fn invited_user_ids(&self) -> HashSet<UserId> {
        self.inner.lock().invited_user_ids().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listener_count()
    }

    pub fn is_invited(&self, user_id: UserId) -> bool {
        self.inner.lock().is_invited(user_id)
    }

    pub fn is_connected(&self, key: &ListenerKey) -> bool {
        self.inner.lock().is_connected(key)
    }

    pub fn invite(&self, user_id: UserId) -> bool {
        self.inner.lock().invite(user_id)
    }

    pub fn invite_all(&self, user_ids: impl IntoIterator<Item = UserId>) -> usize {
        self.inner.lock().invite_all(user_ids)
    }

    pub fn connect(&self, listener: Arc<dyn ListeningUser>) -> Result<bool, DomainError> {
        self.inner.lock().connect(listener)
    }

    /// Connect a listener and replay the existing log to it through `receive_message`
    ///
    /// The replay runs under the session lock so a concurrent write cannot be
    /// forwarded ahead of the backlog; `receive_message` must not call back
    /// into this handle. Returns `None` when the listener was already
    /// connected, otherwise the number of replayed messages it accepted.
    pub fn connect_and_replay(
        &self,
        listener: Arc<dyn ListeningUser>,
    ) -> Result<Option<usize>, DomainError> {
        let mut session = self.inner.lock();
        if !session.connect(listener.clone())? {
            return Ok(None);
        }

        let mut replayed = 0;
        for message in session.messages().to_vec() {
            match listener.receive_message(message) {
                Ok(()) => replayed += 1,
                Err(err) if err.is_terminal() => {
                    session.disconnect(&listener.key());
                    break;
                }
                Err(_) => {}
            }
        }

        Ok(Some(replayed))
    }

    pub fn disconnect(&self, key: &ListenerKey) -> bool {
        self.inner.lock().disconnect(key)
    }

    /// Write a message and fan it out without holding the state lock during delivery
    ///
    /// Writers are serialized from append to the end of delivery, so
    /// concurrent writes reach each listener in log order.
    pub fn write_message(
        &self,
        user_id: UserId,
        text: impl Into<String>,
    ) -> Result<FanOutReport, DomainError> {
        let delivery = self.delivery.lock();
        let (message, listeners) = self.inner.lock().record_message(user_id, text)?;

        let report = StreamingSession::deliver(message, &listeners);
        drop(delivery);

        let closed: Vec<&ListenerKey> = report.closed_listeners().collect();
        if !closed.is_empty() {
            let mut session = self.inner.lock();
            for key in closed {
                session.disconnect(key);
            }
        }

        Ok(report)
    }
}

impl From<StreamingSession> for SessionHandle {
    fn from(session: StreamingSession) -> Self {
        Self::new(session)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("owner_id", &self.owner_id)
            .finish()
    }
}
