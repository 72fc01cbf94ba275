//! Admin session extractor
//!
//! Handlers that take an [`AdminSession`] argument only run for requests
//! carrying a valid admin bearer token.

use axum::{extract::FromRequestParts, http::request::Parts};
use http::HeaderMap;
use shared::error::AppError;

use crate::auth::{JwtError, JwtService};
use crate::state::AppState;

/// Verified admin token
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// Token id (`jti`)
    pub token_id: String,
    /// Expiry (Unix seconds)
    pub expires_at: i64,
}

impl AdminSession {
    /// Verify the `Authorization` header of a request
    pub fn from_headers(headers: &HeaderMap, jwt: &JwtService) -> Result<Self, AppError> {
        let Some(header) = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            tracing::debug!("Admin request without Authorization header");
            return Err(AppError::not_authenticated());
        };

        let token = JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

        match jwt.validate_token(token) {
            Ok(claims) => Ok(Self {
                token_id: claims.jti,
                expires_at: claims.exp,
            }),
            Err(JwtError::ExpiredToken) => Err(AppError::token_expired()),
            Err(e) => {
                tracing::warn!(error = %e, "Admin token rejected");
                Err(AppError::invalid_token("Invalid token"))
            }
        }
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<AdminSession>() {
            return Ok(session.clone());
        }

        let session = Self::from_headers(&parts.headers, &state.jwt)?;
        parts.extensions.insert(session.clone());
        Ok(session)
    }
}
