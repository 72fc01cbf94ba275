//! `/users` - customer registration (public) and management (admin)

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use shared::error::AppError;
use shared::models::{User, UserCreate, UserDelete, UserDeletion, UserStatusUpdate};
use shared::util::now_millis;

use super::extract::ApiJson;
use super::{ApiResult, preflight};
use crate::auth::AdminSession;
use crate::services::users;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/users",
        get(list)
            .post(register)
            .put(approve)
            .patch(set_status)
            .delete(delete)
            .options(preflight),
    )
}

async fn list(_admin: AdminSession, State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(Json(users::list(state.store.as_ref()).await?))
}

async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserCreate>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = users::register(state.store.as_ref(), req, now_millis()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT: legacy approve when `status` is absent
async fn approve(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserStatusUpdate>,
) -> ApiResult<User> {
    let user = users::set_status(state.store.as_ref(), &req.id, req.status.as_deref()).await?;
    Ok(Json(user))
}

async fn set_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserStatusUpdate>,
) -> ApiResult<User> {
    let status = req
        .status
        .as_deref()
        .ok_or_else(|| AppError::required("status"))?;
    let user = users::set_status(state.store.as_ref(), &req.id, Some(status)).await?;
    Ok(Json(user))
}

async fn delete(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserDelete>,
) -> ApiResult<UserDeletion> {
    let summary = users::delete(state.store.as_ref(), &req.id, req.cascade).await?;
    Ok(Json(summary))
}
