//! `/statistics` - monthly totals (admin)

use axum::{Json, Router, extract::State, routing::get};
use shared::models::{AckResponse, PeriodStatistics, StatisticsQuery};

use super::extract::ApiQuery;
use super::{ApiResult, preflight};
use crate::auth::AdminSession;
use crate::services::statistics;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/statistics",
        get(compute).post(record).options(preflight),
    )
}

async fn compute(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatisticsQuery>,
) -> ApiResult<Vec<PeriodStatistics>> {
    Ok(Json(statistics::compute(state.store.as_ref(), &query).await?))
}

/// Older admin UIs still post snapshots here; nothing is stored
async fn record(_admin: AdminSession) -> ApiResult<AckResponse> {
    Ok(Json(AckResponse::with_message(
        "Statistics are now calculated in real-time",
    )))
}
