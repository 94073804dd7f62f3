use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pulse_common::error::{PulseError, PulseResult};
use pulse_db::health::models::{HealthSnapshot, HealthSnapshotFilter, ScoreHistoryPoint};
use pulse_db::health::repositories::HealthSnapshotRepository;
use pulse_db::knowledge::models::{KnowledgeMatch, KnowledgeQuery};
use pulse_db::knowledge::repositories::KnowledgeRepository;
use pulse_db::metrics::models::{MetricSample, MetricValue};
use pulse_db::metrics::repositories::MetricRepository;
use uuid::Uuid;

#[derive(Default)]
pub struct MockMetricRepo {
    pub samples: Mutex<Vec<MetricSample>>,
    pub fail: bool,
}

impl MockMetricRepo {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn push(&self, user_id: Uuid, key: &str, value: MetricValue, captured_at: DateTime<Utc>) {
        self.samples.lock().unwrap().push(MetricSample {
            id: Uuid::new_v4(),
            user_id,
            kpi_key: key.to_string(),
            value,
            captured_at,
        });
    }
}

#[async_trait]
impl MetricRepository for MockMetricRepo {
    async fn list_samples_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> PulseResult<Vec<MetricSample>> {
        if self.fail {
            return Err(PulseError::Database("connection refused".to_string()));
        }
        let mut rows: Vec<MetricSample> = self
            .samples
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && s.captured_at >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        Ok(rows)
    }
}

#[derive(Default)]
pub struct MockSnapshotRepo {
    pub rows: Mutex<Vec<HealthSnapshot>>,
    pub fail_save: bool,
    pub fail_read: bool,
}

impl MockSnapshotRepo {
    pub fn saved(&self) -> Vec<HealthSnapshot> {
        self.rows.lock().unwrap().clone()
    }

    fn for_user(&self, user_id: Option<Uuid>) -> Vec<HealthSnapshot> {
        let mut rows: Vec<HealthSnapshot> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| user_id.map_or(true, |u| r.user_id == u))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.calculated_at.cmp(&a.calculated_at));
        rows
    }
}

#[async_trait]
impl HealthSnapshotRepository for MockSnapshotRepo {
    async fn save_snapshot(&self, snapshot: HealthSnapshot) -> PulseResult<HealthSnapshot> {
        if self.fail_save {
            return Err(PulseError::Database("disk full".to_string()));
        }
        self.rows.lock().unwrap().push(snapshot.clone());
        Ok(snapshot)
    }

    async fn list_recent_scores(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> PulseResult<Vec<ScoreHistoryPoint>> {
        if self.fail_read {
            return Err(PulseError::Database("timeout".to_string()));
        }
        Ok(self
            .for_user(Some(user_id))
            .into_iter()
            .take(limit as usize)
            .map(|r| ScoreHistoryPoint {
                overall_score: r.overall_score,
                captured_at: r.calculated_at,
            })
            .collect())
    }

    async fn get_latest(&self, user_id: Uuid) -> PulseResult<Option<HealthSnapshot>> {
        if self.fail_read {
            return Err(PulseError::Database("timeout".to_string()));
        }
        Ok(self.for_user(Some(user_id)).into_iter().next())
    }

    async fn list_snapshots(
        &self,
        filter: HealthSnapshotFilter,
    ) -> PulseResult<Vec<HealthSnapshot>> {
        if self.fail_read {
            return Err(PulseError::Database("timeout".to_string()));
        }
        Ok(self
            .for_user(filter.user_id)
            .into_iter()
            .filter(|r| filter.from.map_or(true, |f| r.calculated_at >= f))
            .filter(|r| filter.to.map_or(true, |t| r.calculated_at <= t))
            .skip(filter.offset.unwrap_or(0) as usize)
            .take(filter.limit.unwrap_or(50) as usize)
            .collect())
    }
}

#[derive(Default)]
pub struct MockKnowledgeRepo {
    pub documents: Mutex<Vec<KnowledgeMatch>>,
    pub queries: Mutex<Vec<KnowledgeQuery>>,
}

#[async_trait]
impl KnowledgeRepository for MockKnowledgeRepo {
    async fn match_documents(&self, query: KnowledgeQuery) -> PulseResult<Vec<KnowledgeMatch>> {
        let mut matches: Vec<KnowledgeMatch> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.company_id == query.company_id && d.similarity >= query.threshold)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(query.limit as usize);
        self.queries.lock().unwrap().push(query);
        Ok(matches)
    }
}
