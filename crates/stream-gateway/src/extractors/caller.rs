//! Caller identity extractor
//!
//! The caller's account id arrives in the `x-user-id` header. Identity is
//! asserted by the client; there is no authentication layer.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use stream_common::AppError;
use stream_core::UserId;

use crate::response::ApiError;

/// Header carrying the caller's account id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Account id of the caller
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(AppError::MissingUserId)?
            .to_str()
            .map_err(|_| AppError::InvalidUserId("header is not valid ASCII".to_string()))?;

        let user_id = UserId::parse(raw).map_err(|e| AppError::InvalidUserId(e.to_string()))?;

        Ok(CallerId(user_id))
    }
}
