//! Admin authentication

mod extractor;
pub mod jwt;

pub use extractor::AdminSession;
pub use jwt::{AdminClaims, IssuedToken, JwtError, JwtService};
