//! Data models
//!
//! Shared between bakery-server and bakery-client (via API).
//! Wire names are camelCase; timestamps are epoch milliseconds.

pub mod admin;
pub mod order;
pub mod statistics;
pub mod user;

// Re-exports
pub use admin::*;
pub use order::*;
pub use statistics::*;
pub use user::*;
