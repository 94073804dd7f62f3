pub mod embedding;
pub mod handlers;
pub mod requests;
pub mod responses;
pub mod service;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/knowledge/search", post(handlers::search_knowledge))
}
