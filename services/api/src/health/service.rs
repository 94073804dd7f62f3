use std::sync::Arc;

use chrono::Duration;
use pulse_common::clock::Clock;
use pulse_common::error::{PulseError, PulseResult};
use pulse_db::health::models::{
    BusinessHealthScore, HealthSnapshot, HealthSnapshotFilter, HealthTrend,
};
use pulse_db::health::repositories::HealthSnapshotRepository;
use pulse_db::metrics::repositories::MetricRepository;
use pulse_scoring::{
    assemble, compute_trend, evaluate, latest_values, KpiDefinition, KPI_DEFINITIONS,
};
use uuid::Uuid;

use super::recommend::{RecommendationInput, RecommendationSource};

/// Snapshots read for the trend comparison.
const TREND_WINDOW: i64 = 2;

pub struct HealthScoreService {
    metrics: Arc<dyn MetricRepository>,
    snapshots: Arc<dyn HealthSnapshotRepository>,
    recommender: Arc<dyn RecommendationSource>,
    clock: Arc<dyn Clock>,
    definitions: &'static [KpiDefinition],
    lookback: Duration,
}

impl HealthScoreService {
    pub fn new(
        metrics: Arc<dyn MetricRepository>,
        snapshots: Arc<dyn HealthSnapshotRepository>,
        recommender: Arc<dyn RecommendationSource>,
        clock: Arc<dyn Clock>,
        lookback_days: i64,
    ) -> Self {
        Self {
            metrics,
            snapshots,
            recommender,
            clock,
            definitions: KPI_DEFINITIONS,
            lookback: Duration::days(lookback_days),
        }
    }

    pub fn with_definitions(mut self, definitions: &'static [KpiDefinition]) -> Self {
        self.definitions = definitions;
        self
    }

    /// Score the user's latest metrics, persist the result and return it.
    ///
    /// A failed metric read or a failed insert fails the whole call. History
    /// and recommendation failures degrade to a stable trend and no
    /// recommendations.
    pub async fn get_business_health_score(
        &self,
        user_id: Uuid,
    ) -> PulseResult<BusinessHealthScore> {
        let now = self.clock.now();

        let samples = self
            .metrics
            .list_samples_since(user_id, now - self.lookback)
            .await
            .map_err(|e| PulseError::DataFetch(e.to_string()))?;

        let latest = latest_values(&samples);
        let card = evaluate(self.definitions, &latest);

        let trend = match self.snapshots.list_recent_scores(user_id, TREND_WINDOW).await {
            Ok(history) => compute_trend(&history),
            Err(e) => {
                tracing::warn!(
                    %user_id,
                    error = %e,
                    "score history unavailable, assuming stable trend"
                );
                HealthTrend::stable()
            }
        };

        let input = RecommendationInput {
            user_id,
            overall_score: card.overall_score,
            category_scores: card.category_scores.clone(),
            kpi_scores: card.kpi_scores.clone(),
        };
        let recommendations = match self.recommender.recommend(&input).await {
            Ok(recs) => recs,
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "recommendation source failed");
                Vec::new()
            }
        };

        let score = assemble(card, trend, recommendations, now);

        self.snapshots
            .save_snapshot(HealthSnapshot::from_score(user_id, &score, now))
            .await
            .map_err(|e| PulseError::Persistence(e.to_string()))?;

        tracing::info!(
            %user_id,
            samples = samples.len(),
            overall_score = score.overall_score,
            data_quality = score.data_quality,
            "business health score calculated"
        );

        Ok(score)
    }

    pub async fn latest_snapshot(&self, user_id: Uuid) -> PulseResult<Option<HealthSnapshot>> {
        self.snapshots.get_latest(user_id).await
    }

    pub async fn list_snapshots(
        &self,
        filter: HealthSnapshotFilter,
    ) -> PulseResult<Vec<HealthSnapshot>> {
        self.snapshots.list_snapshots(filter).await
    }
}
