pub mod handlers;
pub mod model_client;
pub mod recommend;
pub mod responses;
pub mod service;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/business-health", get(handlers::get_business_health))
        .route("/business-health/latest", get(handlers::get_latest_snapshot))
        .route("/business-health/history", get(handlers::list_snapshot_history))
}
