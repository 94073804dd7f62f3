use async_trait::async_trait;
use uuid::Uuid;

use crate::health::models::{HealthSnapshot, HealthSnapshotFilter, ScoreHistoryPoint};
use pulse_common::error::PulseResult;

#[async_trait]
pub trait HealthSnapshotRepository: Send + Sync {
    /// Append a snapshot. Existing rows are never updated.
    async fn save_snapshot(&self, snapshot: HealthSnapshot) -> PulseResult<HealthSnapshot>;

    /// The `limit` most recent overall scores for a user, newest first.
    async fn list_recent_scores(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> PulseResult<Vec<ScoreHistoryPoint>>;

    async fn get_latest(&self, user_id: Uuid) -> PulseResult<Option<HealthSnapshot>>;
    async fn list_snapshots(
        &self,
        filter: HealthSnapshotFilter,
    ) -> PulseResult<Vec<HealthSnapshot>>;
}
