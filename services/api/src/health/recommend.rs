use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use pulse_common::cache::TtlCache;
use pulse_common::clock::Clock;
use pulse_common::error::PulseResult;
use pulse_db::health::models::{CategoryScore, KpiScore};
use pulse_scoring::generate_recommendations;
use uuid::Uuid;

/// Scored state a recommendation source works from.
#[derive(Debug, Clone)]
pub struct RecommendationInput {
    pub user_id: Uuid,
    pub overall_score: i32,
    pub category_scores: Vec<CategoryScore>,
    pub kpi_scores: Vec<KpiScore>,
}

impl RecommendationInput {
    /// Stable key for a given set of scores. Values are ignored; two runs with
    /// the same scores get the same recommendations.
    pub fn fingerprint(&self) -> String {
        let mut key = self.overall_score.to_string();
        for category in &self.category_scores {
            let _ = write!(key, "|{}:{}", category.category.as_str(), category.score);
        }
        for kpi in &self.kpi_scores {
            let _ = write!(key, "|{}:{}", kpi.key, kpi.score);
        }
        key
    }
}

#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(&self, input: &RecommendationInput) -> PulseResult<Vec<String>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedRecommendations;

#[async_trait]
impl RecommendationSource for RuleBasedRecommendations {
    async fn recommend(&self, input: &RecommendationInput) -> PulseResult<Vec<String>> {
        Ok(generate_recommendations(
            &input.kpi_scores,
            &input.category_scores,
        ))
    }
}

/// Wraps a source with a TTL cache keyed by user and score fingerprint.
/// Failures are not cached. Expired entries are dropped on every miss.
pub struct CachedRecommendations<S> {
    inner: S,
    cache: TtlCache<(Uuid, String), Vec<String>>,
}

impl<S: RecommendationSource> CachedRecommendations<S> {
    pub fn new(inner: S, ttl: chrono::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl, clock),
        }
    }
}

#[async_trait]
impl<S: RecommendationSource> RecommendationSource for CachedRecommendations<S> {
    async fn recommend(&self, input: &RecommendationInput) -> PulseResult<Vec<String>> {
        let key = (input.user_id, input.fingerprint());
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(user_id = %input.user_id, "recommendation cache hit");
            return Ok(hit);
        }

        let recommendations = self.inner.recommend(input).await?;
        // stale fingerprints are never read again
        let purged = self.cache.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "dropped expired recommendation entries");
        }
        self.cache.insert(key, recommendations.clone());
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pulse_common::clock::ManualClock;
    use pulse_common::error::PulseError;
    use pulse_db::health::models::{HealthStatus, KpiCategory};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl RecommendationSource for Arc<CountingSource> {
        async fn recommend(&self, _input: &RecommendationInput) -> PulseResult<Vec<String>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PulseError::Upstream("model offline".to_string()));
            }
            Ok(vec![format!("call {n}")])
        }
    }

    fn input(user_id: Uuid, sales: i32) -> RecommendationInput {
        RecommendationInput {
            user_id,
            overall_score: sales,
            category_scores: vec![CategoryScore {
                category: KpiCategory::Sales,
                score: sales,
                weight: 1.0,
                kpis: vec![],
                status: HealthStatus::Fair,
            }],
            kpi_scores: vec![],
        }
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn rule_based_source_is_deterministic() {
        let source = RuleBasedRecommendations;
        let input = input(Uuid::new_v4(), 40);

        let first = source.recommend(&input).await.unwrap();
        let second = source.recommend(&input).await.unwrap();
        assert_eq!(first, second);
        assert!(first[0].contains("Sales"));
    }

    #[tokio::test]
    async fn cache_serves_repeat_requests_until_ttl() {
        let clock = clock();
        let inner = Arc::new(CountingSource::new(false));
        let cached =
            CachedRecommendations::new(inner.clone(), Duration::seconds(60), clock.clone());
        let user = Uuid::new_v4();

        assert_eq!(cached.recommend(&input(user, 70)).await.unwrap(), vec!["call 0"]);
        assert_eq!(cached.recommend(&input(user, 70)).await.unwrap(), vec!["call 0"]);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::seconds(61));
        assert_eq!(cached.recommend(&input(user, 70)).await.unwrap(), vec!["call 1"]);
    }

    #[tokio::test]
    async fn cache_key_includes_user_and_scores() {
        let inner = Arc::new(CountingSource::new(false));
        let cached = CachedRecommendations::new(inner.clone(), Duration::seconds(60), clock());
        let user = Uuid::new_v4();

        cached.recommend(&input(user, 70)).await.unwrap();
        cached.recommend(&input(user, 71)).await.unwrap();
        cached.recommend(&input(Uuid::new_v4(), 70)).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn expired_entries_do_not_accumulate() {
        let clock = clock();
        let inner = Arc::new(CountingSource::new(false));
        let cached =
            CachedRecommendations::new(inner.clone(), Duration::seconds(60), clock.clone());
        let user = Uuid::new_v4();

        for score in 0..1000 {
            cached.recommend(&input(user, score)).await.unwrap();
            clock.advance(Duration::seconds(120));
        }

        assert_eq!(inner.calls.load(Ordering::SeqCst), 1000);
        assert_eq!(cached.cache.len(), 1);
    }

    #[tokio::test]
    async fn live_entries_survive_a_purge() {
        let clock = clock();
        let inner = Arc::new(CountingSource::new(false));
        let cached =
            CachedRecommendations::new(inner.clone(), Duration::seconds(60), clock.clone());
        let user = Uuid::new_v4();

        cached.recommend(&input(user, 10)).await.unwrap();
        clock.advance(Duration::seconds(30));
        cached.recommend(&input(user, 20)).await.unwrap();

        assert_eq!(cached.cache.len(), 2);
        assert_eq!(cached.recommend(&input(user, 10)).await.unwrap(), vec!["call 0"]);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let inner = Arc::new(CountingSource::new(true));
        let cached = CachedRecommendations::new(inner.clone(), Duration::seconds(60), clock());
        let user = Uuid::new_v4();

        assert!(cached.recommend(&input(user, 70)).await.is_err());
        assert!(cached.recommend(&input(user, 70)).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
