use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raw KPI reading as the metric source stores it.
///
/// Serialized untagged so the JSON shape is the bare value (`true`, `12.5`,
/// `"87%"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Default for MetricValue {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kpi_key: String,
    pub value: MetricValue,
    pub captured_at: DateTime<Utc>,
}
