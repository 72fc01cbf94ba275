//! Client error types

use reqwest::StatusCode;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection or protocol failure before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No response within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The server answered with an error body
    #[error("API error ({status}): {error}")]
    Api { status: StatusCode, error: AppError },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Queue file could not be read or written
    #[error("Queue storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    /// Worth retrying later: timeouts, connection failures and 5xx
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Timeout => true,
            ClientError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ClientError::Api { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    /// The server already holds this write (409)
    pub fn is_already_applied(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::CONFLICT)
    }

    /// Error code from the server body, if any
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { error, .. } => Some(error.code),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
