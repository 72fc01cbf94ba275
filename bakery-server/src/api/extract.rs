//! Request extractors with JSON error bodies
//!
//! Axum's own `Json`/`Query` reject with plain-text 415/422 responses; these
//! wrappers answer 400 with the usual `{code, error}` body instead. An empty
//! body reads as `{}` so payload-less POSTs still deserialize.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use http::request::Parts;
use serde::de::DeserializeOwned;
use shared::error::AppError;

/// JSON body, content type not enforced
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid_request(format!("Failed to read body: {e}")))?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body)
            .map(ApiJson)
            .map_err(|e| AppError::invalid_request(format!("Invalid JSON body: {e}")))
    }
}

/// Query string
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|e| AppError::invalid_request(e.body_text()))
    }
}
