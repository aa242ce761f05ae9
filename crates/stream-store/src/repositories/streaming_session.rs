//! In-memory implementation of StreamingSessionRepository

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use stream_core::{
    DomainError, RepoResult, SessionHandle, StreamingSession, StreamingSessionId,
    StreamingSessionRepository, UserId,
};

/// Process-local session store backed by `DashMap`
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct InMemoryStreamingSessionRepository {
    sessions: Arc<DashMap<StreamingSessionId, SessionHandle>>,
}

impl InMemoryStreamingSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository pre-populated with sessions
    pub fn with_sessions(sessions: impl IntoIterator<Item = StreamingSession>) -> Self {
        let repo = Self::new();
        for session in sessions {
            let handle = SessionHandle::new(session);
            repo.sessions.insert(handle.id(), handle);
        }
        repo
    }
}

impl std::fmt::Debug for InMemoryStreamingSessionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStreamingSessionRepository")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

#[async_trait]
impl StreamingSessionRepository for InMemoryStreamingSessionRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: StreamingSessionId) -> RepoResult<SessionHandle> {
        self.sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(DomainError::StreamingSessionNotFound(id))
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<SessionHandle>> {
        let mut owned: Vec<SessionHandle> = self
            .sessions
            .iter()
            .filter(|entry| entry.owner_id() == owner_id)
            .map(|entry| entry.value().clone())
            .collect();

        // Oldest first
        owned.sort_by_key(|handle| (handle.with_session(StreamingSession::created_at), handle.id()));

        Ok(owned)
    }

    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    async fn save(&self, session: SessionHandle) -> RepoResult<()> {
        let replaced = self.sessions.insert(session.id(), session).is_some();
        debug!(replaced, "Session stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: StreamingSessionId) -> RepoResult<bool> {
        Ok(self.sessions.remove(&id).is_some())
    }

    async fn count(&self) -> RepoResult<usize> {
        Ok(self.sessions.len())
    }
}
