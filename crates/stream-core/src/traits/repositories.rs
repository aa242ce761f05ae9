//! Repository traits (ports) - define the interface for session storage
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::SessionHandle;
use crate::error::DomainError;
use crate::value_objects::{StreamingSessionId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Streaming Session Repository
// ============================================================================

#[async_trait]
pub trait StreamingSessionRepository: Send + Sync {
    /// Find session by ID
    ///
    /// Fails with `DomainError::StreamingSessionNotFound` when the id does not resolve.
    /// Returns a shared handle: mutations through it are visible to later lookups.
    async fn find_by_id(&self, id: StreamingSessionId) -> RepoResult<SessionHandle>;

    /// List all sessions owned by a user
    async fn find_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<SessionHandle>>;

    /// Store a session (insert or replace)
    async fn save(&self, session: SessionHandle) -> RepoResult<()>;

    /// Remove a session, returning whether it existed
    async fn delete(&self, id: StreamingSessionId) -> RepoResult<bool>;

    /// Number of stored sessions
    async fn count(&self) -> RepoResult<usize>;
}
