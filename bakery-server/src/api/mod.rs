//! HTTP API
//!
//! - [`health`] - liveness
//! - [`users`] - customer registration and approval
//! - [`orders`] - order placement, tracking and lifecycle
//! - [`statistics`] - monthly totals
//! - [`admin`] - admin password and session tokens
//!
//! Every route is served both at the root and under `/.netlify/functions`,
//! the paths the storefront was first deployed with.

pub mod admin;
pub mod extract;
pub mod health;
pub mod orders;
pub mod statistics;
pub mod users;

use axum::{Json, Router, http::StatusCode};
use shared::error::{AppError, ErrorCode};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Prefix of the legacy serverless deployment
pub const LEGACY_PREFIX: &str = "/.netlify/functions";

/// Bare `OPTIONS` (CORS preflights are answered by the CORS layer)
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> AppError {
    AppError::new(ErrorCode::MethodNotAllowed)
}

async fn not_found() -> AppError {
    AppError::not_found("Route")
}

/// All routes, no middleware, no state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(orders::router())
        .merge(statistics::router())
        .merge(admin::router())
        .method_not_allowed_fallback(method_not_allowed)
}

/// Fully configured application
pub fn build_app(state: AppState) -> Router {
    let routes = build_router();
    Router::new()
        .merge(routes.clone())
        .nest(LEGACY_PREFIX, routes)
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
