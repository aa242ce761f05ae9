//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::StreamingSessionId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Streaming session not found: {0}")]
    StreamingSessionNotFound(StreamingSessionId),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the owner can write messages to this streaming session")]
    NotSessionOwner,

    #[error("You are not invited to this streaming session")]
    NotInvited,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::StreamingSessionNotFound(_) => "UNKNOWN_STREAMING_SESSION",
            Self::NotSessionOwner => "NOT_SESSION_OWNER",
            Self::NotInvited => "NOT_INVITED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StreamingSessionNotFound(_))
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotSessionOwner | Self::NotInvited)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::ContentTooLong { .. })
    }
}
