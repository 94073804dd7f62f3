use axum::extract::State;
use axum::Json;
use pulse_common::error::PulseError;

use crate::error::ApiError;
use crate::extractors::CompanyId;
use crate::AppState;

use super::requests::KnowledgeSearchRequest;
use super::responses::KnowledgeSearchResponse;

pub async fn search_knowledge(
    State(state): State<AppState>,
    CompanyId(company): CompanyId,
    Json(body): Json<KnowledgeSearchRequest>,
) -> Result<Json<KnowledgeSearchResponse>, ApiError> {
    let search = state.knowledge.as_ref().ok_or_else(|| {
        PulseError::Unavailable("knowledge search is not configured".to_string())
    })?;

    let data = search
        .search(company, &body.query, body.limit, body.threshold)
        .await?;
    let count = data.len();
    Ok(Json(KnowledgeSearchResponse { data, count }))
}
