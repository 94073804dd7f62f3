use axum::extract::{Query, State};
use axum::Json;
use pulse_common::error::PulseError;
use pulse_db::health::models::HealthSnapshotFilter;

use crate::error::ApiError;
use crate::extractors::UserId;
use crate::health::responses::{
    BusinessHealthResponse, HealthHistoryResponse, HealthSnapshotResponse,
};
use crate::AppState;

const MAX_HISTORY_LIMIT: i64 = 200;

pub async fn get_business_health(
    State(state): State<AppState>,
    UserId(user): UserId,
) -> Result<Json<BusinessHealthResponse>, ApiError> {
    let data = state.health.get_business_health_score(user).await?;
    Ok(Json(BusinessHealthResponse { data }))
}

pub async fn get_latest_snapshot(
    State(state): State<AppState>,
    UserId(user): UserId,
) -> Result<Json<HealthSnapshotResponse>, ApiError> {
    let snapshot = state
        .health
        .latest_snapshot(user)
        .await?
        .ok_or_else(|| PulseError::NotFound("no health snapshot found for this user".to_string()))?;

    Ok(Json(HealthSnapshotResponse { data: snapshot }))
}

pub async fn list_snapshot_history(
    State(state): State<AppState>,
    UserId(user): UserId,
    Query(mut filter): Query<HealthSnapshotFilter>,
) -> Result<Json<HealthHistoryResponse>, ApiError> {
    if let Some(limit) = filter.limit {
        if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
            return Err(ApiError(PulseError::Validation(format!(
                "limit must be between 1 and {MAX_HISTORY_LIMIT}"
            ))));
        }
    }
    if filter.offset.is_some_and(|o| o < 0) {
        return Err(ApiError(PulseError::Validation(
            "offset must not be negative".to_string(),
        )));
    }

    filter.user_id = Some(user);
    let data = state.health.list_snapshots(filter).await?;
    let count = data.len();
    Ok(Json(HealthHistoryResponse { data, count }))
}
