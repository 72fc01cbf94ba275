//! Shared types for the bakery storefront
//!
//! Domain models, the unified error system and small money/time helpers
//! used by both the server and the storefront client.

pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, ErrorBody, ErrorCode};
