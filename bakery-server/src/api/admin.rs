//! Admin password endpoints

use axum::{Json, Router, extract::State, routing::post};
use shared::models::{
    AckResponse, AdminLoginRequest, AdminLoginResponse, ChangePasswordRequest,
    RotatePasswordRequest,
};
use shared::util::now_millis;

use super::extract::ApiJson;
use super::{ApiResult, preflight};
use crate::services::credentials;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin-auth", post(login).options(preflight))
        .route(
            "/admin-change-password",
            post(change_password).options(preflight),
        )
        .route(
            "/admin-reset-password",
            post(reset_password).options(preflight),
        )
        .route(
            "/admin-rotate-password",
            post(rotate_password).options(preflight),
        )
}

async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AdminLoginRequest>,
) -> ApiResult<AdminLoginResponse> {
    Ok(Json(
        credentials::authenticate(&state, &req.password, now_millis()).await?,
    ))
}

async fn change_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> ApiResult<AckResponse> {
    Ok(Json(
        credentials::change_password(&state, &req, now_millis()).await?,
    ))
}

async fn reset_password(State(state): State<AppState>) -> ApiResult<AckResponse> {
    Ok(Json(credentials::reset_password(&state, now_millis()).await?))
}

async fn rotate_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RotatePasswordRequest>,
) -> ApiResult<AckResponse> {
    Ok(Json(
        credentials::rotate_password(&state, &req.current_password, now_millis()).await?,
    ))
}
