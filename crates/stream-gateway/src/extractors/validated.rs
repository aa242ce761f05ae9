//! Validated JSON extractor

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// JSON body checked with the `validator` crate before the handler runs
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| match e {
            JsonRejection::JsonDataError(e) => ApiError::invalid_body(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => ApiError::invalid_body(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => ApiError::invalid_body(e.body_text()),
            other => ApiError::invalid_body(other.body_text()),
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
