//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use stream_core::StreamingSessionId;

use crate::response::ApiError;

/// `:session_id` path parameter parsed as a `StreamingSessionId`
#[derive(Debug, Clone, Copy)]
pub struct SessionIdPath(pub StreamingSessionId);

#[async_trait]
impl<S> FromRequestParts<S> for SessionIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        let session_id = StreamingSessionId::parse(&raw)
            .map_err(|_| ApiError::invalid_path("Invalid session_id format"))?;

        Ok(SessionIdPath(session_id))
    }
}
