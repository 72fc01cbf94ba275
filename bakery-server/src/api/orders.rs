//! `/orders` - placement and tracking by phone (public), management (admin)

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use http::HeaderMap;
use shared::error::AppError;
use shared::models::{Order, OrderCreate, OrderStatusUpdate, OrdersQuery};
use shared::util::now_millis;

use super::extract::{ApiJson, ApiQuery};
use super::{ApiResult, preflight};
use crate::auth::AdminSession;
use crate::services::orders::{self, ArchivePolicy};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/orders",
        get(list)
            .post(create)
            .put(update_status)
            .options(preflight),
    )
}

/// With `?phone=` a customer's own orders; without it the admin listing
async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<OrdersQuery>,
) -> ApiResult<Vec<Order>> {
    let phone = query
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    if phone.is_none() {
        AdminSession::from_headers(&headers, &state.jwt)?;
    }

    let policy = ArchivePolicy::from(state.config.as_ref());
    let orders = orders::list(state.store.as_ref(), phone, policy, now_millis()).await?;
    Ok(Json(orders))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<OrderCreate>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = orders::create(state.store.as_ref(), req, now_millis()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn update_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<OrderStatusUpdate>,
) -> ApiResult<Order> {
    let order = orders::update_status(state.store.as_ref(), req, now_millis()).await?;
    Ok(Json(order))
}
