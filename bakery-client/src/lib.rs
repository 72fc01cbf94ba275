//! Bakery Client - storefront API client
//!
//! Remote-first access to the bakery server. Writes that fail for transport
//! reasons are kept in a file-backed queue and replayed with
//! [`StorefrontClient::flush`]; reads always go to the server.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod queue;

pub use api::StorefrontApi;
pub use client::{FlushReport, StorefrontClient, WriteOutcome};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpApi;
pub use queue::{PendingWrite, QueuedWrite, WriteQueue};

// Re-export shared types for convenience
pub use shared::models;
