use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::metrics::models::{MetricSample, MetricValue};
use crate::metrics::repositories::MetricRepository;
use pulse_common::error::{PulseError, PulseResult};

#[derive(Clone)]
pub struct PgMetricRepository {
    pool: PgPool,
}

impl PgMetricRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricRepository for PgMetricRepository {
    async fn list_samples_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> PulseResult<Vec<MetricSample>> {
        let rows = sqlx::query(
            "select id, user_id, kpi_key, value, captured_at
             from kpi_metric_snapshots
             where user_id = $1 and captured_at >= $2
             order by captured_at desc",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PulseError::Database(e.to_string()))?;

        Ok(rows.iter().filter_map(map_sample_row).collect())
    }
}

/// Rows whose value is not a bool, number or string are dropped; the scorer
/// treats the key as missing.
fn map_sample_row(row: &sqlx::postgres::PgRow) -> Option<MetricSample> {
    let kpi_key: String = row.get("kpi_key");
    let raw: serde_json::Value = row.get("value");

    let value = match serde_json::from_value::<MetricValue>(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(kpi_key = %kpi_key, error = %e, "skipping malformed metric value");
            return None;
        }
    };

    Some(MetricSample {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kpi_key,
        value,
        captured_at: row.get("captured_at"),
    })
}
