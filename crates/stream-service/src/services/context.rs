//! Service context - dependency container for services
//!
//! Holds the session repository and the limits services enforce.

use std::sync::Arc;

use stream_common::StreamingConfig;
use stream_core::StreamingSessionRepository;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    session_repo: Arc<dyn StreamingSessionRepository>,
    max_message_length: usize,
}

impl ServiceContext {
    pub fn new(session_repo: Arc<dyn StreamingSessionRepository>, max_message_length: usize) -> Self {
        Self {
            session_repo,
            max_message_length,
        }
    }

    /// Get the streaming session repository
    pub fn session_repo(&self) -> &dyn StreamingSessionRepository {
        self.session_repo.as_ref()
    }

    /// Maximum message length in characters
    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("session_repo", &"...")
            .field("max_message_length", &self.max_message_length)
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    session_repo: Option<Arc<dyn StreamingSessionRepository>>,
    max_message_length: usize,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            session_repo: None,
            max_message_length: StreamingConfig::default().max_message_length,
        }
    }

    pub fn session_repo(mut self, repo: Arc<dyn StreamingSessionRepository>) -> Self {
        self.session_repo = Some(repo);
        self
    }

    pub fn max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    /// Apply limits from the streaming configuration
    pub fn streaming_config(self, config: &StreamingConfig) -> Self {
        self.max_message_length(config.max_message_length)
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let session_repo = self
            .session_repo
            .ok_or_else(|| ServiceError::validation("session_repo is required"))?;

        if self.max_message_length == 0 {
            return Err(ServiceError::validation("max_message_length must be positive"));
        }

        Ok(ServiceContext::new(session_repo, self.max_message_length))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
