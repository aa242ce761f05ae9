//! Handler error types

use stream_core::DomainError;
use stream_service::ServiceError;
use thiserror::Error;

use crate::protocol::CloseCode;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Not invited to streaming session")]
    NotInvited,

    #[error("Streaming session not found")]
    SessionNotFound,

    #[error("Already listening to streaming session")]
    AlreadyListening,

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Close code sent to the client before the socket is closed
    pub fn to_close_code(&self) -> CloseCode {
        match self {
            Self::InvalidPayload(_) => CloseCode::DecodeError,
            Self::NotInvited => CloseCode::NotInvited,
            Self::SessionNotFound => CloseCode::SessionNotFound,
            Self::AlreadyListening => CloseCode::AlreadyListening,
            Self::Service(e) => match e.as_domain() {
                Some(DomainError::NotInvited) => CloseCode::NotInvited,
                Some(DomainError::StreamingSessionNotFound(_)) => CloseCode::SessionNotFound,
                _ => CloseCode::UnknownError,
            },
            Self::Internal(_) => CloseCode::UnknownError,
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
