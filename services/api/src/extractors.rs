use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const COMPANY_ID_HEADER: &str = "X-Company-Id";

/// The user whose metrics are being scored.
pub struct UserId(pub Uuid);

/// The tenant whose knowledge base is searched.
pub struct CompanyId(pub Uuid);

#[derive(Debug)]
pub struct HeaderRejection(String);

impl IntoResponse for HeaderRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.0 });
        (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
    }
}

fn uuid_header(parts: &Parts, name: &str) -> Result<Uuid, HeaderRejection> {
    let header = parts
        .headers
        .get(name)
        .ok_or_else(|| HeaderRejection(format!("missing {name} header")))?;

    let value = header
        .to_str()
        .map_err(|_| HeaderRejection(format!("invalid {name} header value")))?;

    Uuid::parse_str(value).map_err(|_| HeaderRejection(format!("invalid UUID in {name}: {value}")))
}

impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = HeaderRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        uuid_header(parts, USER_ID_HEADER).map(UserId)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CompanyId {
    type Rejection = HeaderRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        uuid_header(parts, COMPANY_ID_HEADER).map(CompanyId)
    }
}
