use pulse_db::health::models::{BusinessHealthScore, HealthSnapshot};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BusinessHealthResponse {
    pub data: BusinessHealthScore,
}

#[derive(Debug, Serialize)]
pub struct HealthSnapshotResponse {
    pub data: HealthSnapshot,
}

#[derive(Debug, Serialize)]
pub struct HealthHistoryResponse {
    pub data: Vec<HealthSnapshot>,
    pub count: usize,
}
