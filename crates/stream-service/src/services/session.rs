//! Session service
//!
//! Creating sessions, writing and reading messages, and attaching listeners.

use std::sync::Arc;

use stream_core::{
    DomainError, ListenerKey, ListeningUser, Message, SessionHandle, StreamingSession,
    StreamingSessionId, UserId,
};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{MessageResponse, SessionResponse, WriteMessageRequest, WriteMessageResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// What happened when a listener asked to connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Newly connected; `replayed` backlog messages were accepted by the listener
    Connected { replayed: usize },
    /// An equal listener was already connected; nothing changed
    AlreadyConnected,
}

/// Session service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an empty session owned by `owner`
    #[instrument(skip(self))]
    pub async fn create_session(&self, owner: UserId) -> ServiceResult<SessionResponse> {
        self.store(StreamingSession::create(owner)).await
    }

    /// Store a session rebuilt from an existing message log
    #[instrument(skip(self, messages))]
    pub async fn restore_session(
        &self,
        owner: UserId,
        messages: Vec<Message>,
    ) -> ServiceResult<SessionResponse> {
        self.store(StreamingSession::create_with_messages(owner, messages)).await
    }

    /// Session summary, visible to the owner and invited users
    #[instrument(skip(self))]
    pub async fn get_session(
        &self,
        requester: UserId,
        session_id: StreamingSessionId,
    ) -> ServiceResult<SessionResponse> {
        let session = self.visible_session(requester, session_id).await?;
        Ok(SessionResponse::from(&session))
    }

    /// Sessions owned by `owner`, oldest first
    #[instrument(skip(self))]
    pub async fn list_owned_sessions(&self, owner: UserId) -> ServiceResult<Vec<SessionResponse>> {
        let sessions = self.ctx.session_repo().find_by_owner(owner).await?;
        Ok(sessions.iter().map(SessionResponse::from).collect())
    }

    /// Append a message as `author` and deliver it to every connected listener
    ///
    /// Ownership is checked before the text is validated. Failed deliveries
    /// are logged and counted; they never fail the write.
    #[instrument(skip(self, request))]
    pub async fn write_message(
        &self,
        author: UserId,
        session_id: StreamingSessionId,
        request: WriteMessageRequest,
    ) -> ServiceResult<WriteMessageResponse> {
        let session = self.ctx.session_repo().find_by_id(session_id).await?;
        if author != session.owner_id() {
            return Err(DomainError::NotSessionOwner.into());
        }

        request.validate()?;

        let max = self.ctx.max_message_length();
        if request.text.chars().count() > max {
            return Err(DomainError::ContentTooLong { max }.into());
        }

        let report = session.write_message(author, request.text)?;

        if !report.is_complete() {
            for (key, err) in &report.failures {
                warn!(session_id = %session_id, listener = %key, error = %err, "Delivery failed");
            }
        }

        info!(
            session_id = %session_id,
            delivered = report.delivered,
            failed = report.failures.len(),
            "Message written"
        );

        Ok(WriteMessageResponse::from(&report))
    }

    /// Message log in write order, visible to the owner and invited users
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        requester: UserId,
        session_id: StreamingSessionId,
    ) -> ServiceResult<Vec<MessageResponse>> {
        let session = self.visible_session(requester, session_id).await?;
        Ok(session.messages().iter().map(MessageResponse::from).collect())
    }

    /// Connect a listener and replay the existing log to it
    ///
    /// Fails with `NotInvited` unless the listener's user is invited or owns the session.
    #[instrument(skip(self, listener), fields(listener = %listener.key()))]
    pub async fn connect_listener(
        &self,
        session_id: StreamingSessionId,
        listener: Arc<dyn ListeningUser>,
    ) -> ServiceResult<ConnectOutcome> {
        let session = self.ctx.session_repo().find_by_id(session_id).await?;

        match session.connect_and_replay(listener)? {
            Some(replayed) => {
                info!(session_id = %session_id, replayed, "Listener connected");
                Ok(ConnectOutcome::Connected { replayed })
            }
            None => {
                debug!(session_id = %session_id, "Listener already connected");
                Ok(ConnectOutcome::AlreadyConnected)
            }
        }
    }

    /// Disconnect a listener, returning whether it was connected
    #[instrument(skip(self))]
    pub async fn disconnect_listener(
        &self,
        session_id: StreamingSessionId,
        key: &ListenerKey,
    ) -> ServiceResult<bool> {
        let session = self.ctx.session_repo().find_by_id(session_id).await?;
        let removed = session.disconnect(key);

        if removed {
            info!(session_id = %session_id, "Listener disconnected");
        }

        Ok(removed)
    }

    async fn store(&self, session: StreamingSession) -> ServiceResult<SessionResponse> {
        let handle = SessionHandle::new(session);
        let response = SessionResponse::from(&handle);

        self.ctx.session_repo().save(handle).await?;

        info!(session_id = %response.id, owner_id = %response.owner_id, "Session created");

        Ok(response)
    }

    async fn visible_session(
        &self,
        requester: UserId,
        session_id: StreamingSessionId,
    ) -> ServiceResult<SessionHandle> {
        let session = self.ctx.session_repo().find_by_id(session_id).await?;

        if !session.is_invited(requester) {
            return Err(DomainError::NotInvited.into());
        }

        Ok(session)
    }
}
