use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pulse_common::error::PulseError;

pub struct ApiError(pub PulseError);

impl From<PulseError> for ApiError {
    fn from(err: PulseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PulseError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            PulseError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            PulseError::DataFetch(_) | PulseError::Persistence(_) => {
                tracing::error!(error = %self.0, "health score unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "health score unavailable".to_string(),
                )
            }
            PulseError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            PulseError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
