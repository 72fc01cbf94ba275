//! Business logic
//!
//! Services take the store (or the whole state when they need configuration,
//! signing keys or email) plus the current time in epoch milliseconds, so
//! tests can drive the clock.

pub mod calendar;
pub mod credentials;
pub mod orders;
pub mod statistics;
pub mod users;
