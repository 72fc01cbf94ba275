//! Admin session tokens
//!
//! HS256 JWTs with a one-hour lifetime. There is no session store: a token
//! stays valid until it expires.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ADMIN_TOKEN_TTL_MS;
use crate::util::random_hex;

const ADMIN_SUBJECT: &str = "admin";

/// Claims carried by an admin token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    /// 32 random bytes, hex
    pub jti: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// A freshly issued token with its validity window in milliseconds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
    pub expires_at: i64,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("token expired")]
    ExpiredToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue an admin token valid for exactly [`ADMIN_TOKEN_TTL_MS`] from `now_ms`
    pub fn issue(&self, now_ms: i64) -> Result<IssuedToken, JwtError> {
        let expires_at = now_ms + ADMIN_TOKEN_TTL_MS;
        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            jti: random_hex(32),
            iat: now_ms / 1000,
            exp: expires_at / 1000,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_in: ADMIN_TOKEN_TTL_MS,
            expires_at,
        })
    }

    /// Verify signature and expiry
    pub fn validate_token(&self, token: &str) -> Result<AdminClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        let data = decode::<AdminClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        if data.claims.sub != ADMIN_SUBJECT {
            return Err(JwtError::InvalidToken("unexpected subject".into()));
        }
        Ok(data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}
