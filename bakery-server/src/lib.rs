//! Bakery storefront backend
//!
//! Customers register with a phone number, wait for admin approval and then
//! place orders; the admin walks each order through its lifecycle and reads
//! monthly totals.
//!
//! ```text
//! bakery-server/src/
//! ├── api/        # HTTP routes and handlers
//! ├── auth/       # admin JWT sessions
//! ├── services/   # business rules (users, orders, statistics, credentials)
//! ├── db/         # Store traits, PostgreSQL and in-memory backends
//! ├── email/      # SendGrid notifications
//! └── config.rs / state.rs / error.rs
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod services;
pub mod state;
pub mod util;

pub use api::build_app;
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
