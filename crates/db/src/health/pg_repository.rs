use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::health::models::{HealthSnapshot, HealthSnapshotFilter, ScoreHistoryPoint};
use crate::health::repositories::HealthSnapshotRepository;
use pulse_common::error::{PulseError, PulseResult};

const SNAPSHOT_COLUMNS: &str = "id, user_id, overall_score, data_quality, category_scores, \
     kpi_scores, recommendations, trends, calculated_at, created_at";

/// How many of a user's newest snapshots `get_latest` inspects. If none of
/// them decode, the user is treated as having no snapshot.
const LATEST_SCAN_ROWS: i64 = 5;

#[derive(Clone)]
pub struct PgHealthSnapshotRepository {
    pool: PgPool,
}

impl PgHealthSnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthSnapshotRepository for PgHealthSnapshotRepository {
    async fn save_snapshot(&self, snapshot: HealthSnapshot) -> PulseResult<HealthSnapshot> {
        let to_json = |value: serde_json::Result<serde_json::Value>| {
            value.map_err(|e| PulseError::Internal(format!("snapshot encode: {e}")))
        };
        let category_scores = to_json(serde_json::to_value(&snapshot.category_scores))?;
        let kpi_scores = to_json(serde_json::to_value(&snapshot.kpi_scores))?;
        let recommendations = to_json(serde_json::to_value(&snapshot.recommendations))?;
        let trends = to_json(serde_json::to_value(snapshot.trends))?;

        sqlx::query(
            "insert into business_health_snapshots
             (id, user_id, overall_score, data_quality, category_scores, kpi_scores,
              recommendations, trends, calculated_at, created_at)
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(snapshot.id)
        .bind(snapshot.user_id)
        .bind(snapshot.overall_score)
        .bind(snapshot.data_quality)
        .bind(category_scores)
        .bind(kpi_scores)
        .bind(recommendations)
        .bind(trends)
        .bind(snapshot.calculated_at)
        .bind(snapshot.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PulseError::Database(e.to_string()))?;

        Ok(snapshot)
    }

    async fn list_recent_scores(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> PulseResult<Vec<ScoreHistoryPoint>> {
        let rows = sqlx::query(
            "select overall_score, calculated_at
             from business_health_snapshots
             where user_id = $1
             order by calculated_at desc
             limit $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PulseError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .filter_map(|r| {
                let overall_score: Option<i32> = r.try_get("overall_score").ok().flatten();
                let captured_at: Option<DateTime<Utc>> = r.try_get("calculated_at").ok();
                match (overall_score, captured_at) {
                    (Some(overall_score), Some(captured_at)) => Some(ScoreHistoryPoint {
                        overall_score,
                        captured_at,
                    }),
                    _ => {
                        tracing::warn!(%user_id, "skipping health snapshot without a score");
                        None
                    }
                }
            })
            .collect())
    }

    async fn get_latest(&self, user_id: Uuid) -> PulseResult<Option<HealthSnapshot>> {
        let rows = sqlx::query(&format!(
            "select {SNAPSHOT_COLUMNS}
             from business_health_snapshots
             where user_id = $1
             order by calculated_at desc
             limit $2"
        ))
        .bind(user_id)
        .bind(LATEST_SCAN_ROWS)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PulseError::Database(e.to_string()))?;

        // newest row that still decodes
        Ok(rows.iter().find_map(map_snapshot_row))
    }

    async fn list_snapshots(
        &self,
        filter: HealthSnapshotFilter,
    ) -> PulseResult<Vec<HealthSnapshot>> {
        let mut qb = QueryBuilder::new(format!(
            "select {SNAPSHOT_COLUMNS} from business_health_snapshots where 1=1"
        ));

        if let Some(user_id) = filter.user_id {
            qb.push(" and user_id = ").push_bind(user_id);
        }
        if let Some(from) = filter.from {
            qb.push(" and calculated_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" and calculated_at <= ").push_bind(to);
        }

        qb.push(" order by calculated_at desc");
        qb.push(" limit ").push_bind(filter.limit.unwrap_or(50));
        qb.push(" offset ").push_bind(filter.offset.unwrap_or(0));

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PulseError::Database(e.to_string()))?;

        Ok(rows.iter().filter_map(map_snapshot_row).collect())
    }
}

fn map_snapshot_row(row: &sqlx::postgres::PgRow) -> Option<HealthSnapshot> {
    let id: Uuid = row.get("id");
    match decode_snapshot_row(row) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!(snapshot_id = %id, error = %e, "skipping malformed health snapshot");
            None
        }
    }
}

fn decode_snapshot_row(row: &sqlx::postgres::PgRow) -> Result<HealthSnapshot, String> {
    fn json_column<T: serde::de::DeserializeOwned>(
        row: &sqlx::postgres::PgRow,
        column: &str,
    ) -> Result<T, String> {
        let value: serde_json::Value = row.try_get(column).map_err(|e| e.to_string())?;
        serde_json::from_value(value).map_err(|e| format!("{column}: {e}"))
    }

    Ok(HealthSnapshot {
        id: row.try_get("id").map_err(|e| e.to_string())?,
        user_id: row.try_get("user_id").map_err(|e| e.to_string())?,
        overall_score: row.try_get("overall_score").map_err(|e| e.to_string())?,
        data_quality: row.try_get("data_quality").map_err(|e| e.to_string())?,
        category_scores: json_column(row, "category_scores")?,
        kpi_scores: json_column(row, "kpi_scores")?,
        recommendations: json_column(row, "recommendations")?,
        trends: json_column(row, "trends")?,
        calculated_at: row.try_get("calculated_at").map_err(|e| e.to_string())?,
        created_at: row.try_get("created_at").map_err(|e| e.to_string())?,
    })
}
