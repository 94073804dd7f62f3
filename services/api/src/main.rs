mod error;
mod extractors;
mod health;
mod knowledge;
#[cfg(test)]
mod testing;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use pulse_common::clock::{Clock, SystemClock};
use pulse_common::types::ServiceInfo;
use pulse_config::{init_tracing, AppConfig};
use pulse_db::health::pg_repository::PgHealthSnapshotRepository;
use pulse_db::knowledge::pg_repository::PgKnowledgeRepository;
use pulse_db::metrics::pg_repository::PgMetricRepository;
use tower_http::cors::CorsLayer;

use crate::health::model_client::{ModelRecommendations, RecommenderConfig};
use crate::health::recommend::{
    CachedRecommendations, RecommendationSource, RuleBasedRecommendations,
};
use crate::health::service::HealthScoreService;
use crate::knowledge::embedding::{EmbeddingClient, EmbeddingConfig};
use crate::knowledge::service::KnowledgeSearch;

#[derive(Clone)]
pub struct AppState {
    pub info: ServiceInfo,
    pub clock: Arc<dyn Clock>,
    pub health: Arc<HealthScoreService>,
    /// `None` when no embedding endpoint is configured.
    pub knowledge: Option<Arc<KnowledgeSearch>>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let uptime_secs = state.info.uptime_secs(state.clock.now());
    Json(serde_json::json!({
        "name": state.info.name,
        "version": state.info.version,
        "instance_id": state.info.instance_id,
        "started_at": state.info.started_at,
        "uptime_secs": uptime_secs,
    }))
}

async fn metrics() -> impl IntoResponse {
    let body = "\
# HELP pulse_up Service up indicator\n\
# TYPE pulse_up gauge\n\
pulse_up 1\n\
# HELP pulse_info Service info\n\
# TYPE pulse_info gauge\n\
pulse_info{service=\"pulse-api\",version=\"0.1.0\"} 1\n";

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-company-id"),
        ]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(health::router())
        .merge(knowledge::router())
        .layer(cors)
        .with_state(state)
}

fn recommendation_source(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Arc<dyn RecommendationSource> {
    let Some(recommender) = RecommenderConfig::from_env() else {
        tracing::info!("no recommender configured, using rule-based recommendations");
        return Arc::new(RuleBasedRecommendations);
    };

    match ModelRecommendations::new(recommender) {
        Ok(model) => {
            let ttl = chrono::Duration::seconds(config.recommendation_cache_ttl_secs);
            tracing::info!(
                ttl_secs = config.recommendation_cache_ttl_secs,
                "using model recommendations"
            );
            Arc::new(CachedRecommendations::new(model, ttl, clock))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "recommender client unavailable, using rule-based recommendations"
            );
            Arc::new(RuleBasedRecommendations)
        }
    }
}

fn knowledge_search(repo: PgKnowledgeRepository) -> Option<Arc<KnowledgeSearch>> {
    let config = EmbeddingConfig::from_env()?;
    match EmbeddingClient::new(config) {
        Ok(client) => Some(Arc::new(KnowledgeSearch::new(
            Arc::new(client),
            Arc::new(repo),
        ))),
        Err(e) => {
            tracing::warn!(error = %e, "embedding client unavailable, knowledge search disabled");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    init_tracing(&config.log_level);
    tracing::info!(service = "pulse-api", "starting");

    let pool = pulse_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let health = HealthScoreService::new(
        Arc::new(PgMetricRepository::new(pool.clone())),
        Arc::new(PgHealthSnapshotRepository::new(pool.clone())),
        recommendation_source(&config, clock.clone()),
        clock.clone(),
        config.metric_lookback_days,
    );

    let state = AppState {
        info: ServiceInfo::new("pulse-api", clock.now()),
        clock,
        health: Arc::new(health),
        knowledge: knowledge_search(PgKnowledgeRepository::new(pool)),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::embedding::Embedder;
    use crate::testing::{MockKnowledgeRepo, MockMetricRepo, MockSnapshotRepo};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use pulse_common::clock::ManualClock;
    use pulse_common::error::PulseResult;
    use pulse_db::knowledge::models::KnowledgeMatch;
    use pulse_db::metrics::models::MetricValue;
    use tower::ServiceExt;
    use uuid::Uuid;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> PulseResult<Vec<f32>> {
            Ok(vec![0.5, 0.5])
        }
    }

    struct Harness {
        metrics: Arc<MockMetricRepo>,
        snapshots: Arc<MockSnapshotRepo>,
        clock: Arc<ManualClock>,
        state: AppState,
    }

    fn harness_with(metrics: MockMetricRepo, knowledge: Option<Arc<KnowledgeSearch>>) -> Harness {
        let metrics = Arc::new(metrics);
        let snapshots = Arc::new(MockSnapshotRepo::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        ));
        let health = HealthScoreService::new(
            metrics.clone(),
            snapshots.clone(),
            Arc::new(RuleBasedRecommendations),
            clock.clone(),
            90,
        );
        Harness {
            metrics,
            snapshots,
            state: AppState {
                info: ServiceInfo::new("pulse-api", clock.now()),
                clock: clock.clone(),
                health: Arc::new(health),
                knowledge,
            },
            clock,
        }
    }

    fn harness() -> Harness {
        harness_with(MockMetricRepo::default(), None)
    }

    fn get_as(uri: &str, user: Uuid) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("X-User-Id", user.to_string())
            .body(Body::empty())
            .unwrap()
    }

    async fn read_body(resp: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn read_body_string(resp: axum::http::Response<Body>) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ── Health / Info / Metrics ─────────────────────────────────────

    #[tokio::test]
    async fn health_returns_ok() {
        let app = build_router(harness().state);
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn info_returns_service_name() {
        let app = build_router(harness().state);
        let resp = app
            .oneshot(Request::builder().uri("/info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["name"], "pulse-api");
        assert_eq!(body["uptime_secs"], 0);
    }

    #[tokio::test]
    async fn metrics_returns_prometheus_text() {
        let app = build_router(harness().state);
        let resp = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body_string(resp).await;
        assert!(body.contains("pulse_up 1"));
    }

    // ── Business health ─────────────────────────────────────────────

    #[tokio::test]
    async fn business_health_requires_user_header() {
        let app = build_router(harness().state);
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/business-health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_body(resp).await;
        assert!(body["error"].as_str().unwrap().contains("X-User-Id"));
    }

    #[tokio::test]
    async fn business_health_rejects_non_uuid_user() {
        let app = build_router(harness().state);
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/business-health")
                    .header("X-User-Id", "not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn business_health_scores_and_persists() {
        let h = harness();
        let user = Uuid::new_v4();
        h.metrics
            .push(user, "crm_adopted", MetricValue::Flag(true), h.clock.now());

        let resp = build_router(h.state.clone())
            .oneshot(get_as("/business-health", user))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        let data = &body["data"];
        assert!(data["overallScore"].is_i64());
        assert!(data["dataQuality"].as_i64().unwrap() > 0);
        assert_eq!(data["categoryScores"].as_array().unwrap().len(), 6);
        assert_eq!(data["trends"]["direction"], "stable");
        assert!(data["recommendations"].as_array().unwrap().len() <= 5);

        let crm = data["kpiScores"]
            .as_array()
            .unwrap()
            .iter()
            .find(|k| k["key"] == "crm_adopted")
            .unwrap();
        assert_eq!(crm["score"], 100.0);
        assert_eq!(crm["value"], true);

        assert_eq!(h.snapshots.saved().len(), 1);
    }

    #[tokio::test]
    async fn business_health_fetch_failure_is_503() {
        let h = harness_with(MockMetricRepo::failing(), None);
        let resp = build_router(h.state)
            .oneshot(get_as("/business-health", Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_body(resp).await["error"], "health score unavailable");
        assert!(h.snapshots.saved().is_empty());
    }

    #[tokio::test]
    async fn latest_returns_404_without_snapshot() {
        let app = build_router(harness().state);
        let resp = app
            .oneshot(get_as("/business-health/latest", Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn latest_returns_most_recent_snapshot() {
        let h = harness();
        let user = Uuid::new_v4();

        h.state.health.get_business_health_score(user).await.unwrap();
        h.clock.advance(chrono::Duration::hours(1));
        let second = h.state.health.get_business_health_score(user).await.unwrap();

        let resp = build_router(h.state.clone())
            .oneshot(get_as("/business-health/latest", user))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["data"]["userId"], user.to_string());
        assert_eq!(
            body["data"]["calculatedAt"],
            serde_json::to_value(second.last_calculated).unwrap()
        );
    }

    #[tokio::test]
    async fn history_lists_user_snapshots_newest_first() {
        let h = harness();
        let user = Uuid::new_v4();
        for _ in 0..3 {
            h.state.health.get_business_health_score(user).await.unwrap();
            h.clock.advance(chrono::Duration::days(1));
        }
        h.state
            .health
            .get_business_health_score(Uuid::new_v4())
            .await
            .unwrap();

        let resp = build_router(h.state.clone())
            .oneshot(get_as("/business-health/history?limit=2", user))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["count"], 2);
        let data = body["data"].as_array().unwrap();
        assert!(data.iter().all(|s| s["userId"] == user.to_string()));
        assert!(data[0]["calculatedAt"].as_str() > data[1]["calculatedAt"].as_str());
    }

    #[tokio::test]
    async fn history_rejects_out_of_range_limit() {
        let app = build_router(harness().state);
        let resp = app
            .oneshot(get_as("/business-health/history?limit=0", Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // ── Knowledge search ────────────────────────────────────────────

    fn search_request(company: Uuid, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/knowledge/search")
            .header("X-Company-Id", company.to_string())
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn knowledge_search_unconfigured_is_503() {
        let app = build_router(harness().state);
        let resp = app
            .oneshot(search_request(
                Uuid::new_v4(),
                serde_json::json!({ "query": "pricing" }),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn knowledge_search_returns_matches() {
        let company = Uuid::new_v4();
        let repo = Arc::new(MockKnowledgeRepo::default());
        repo.documents.lock().unwrap().push(KnowledgeMatch {
            id: Uuid::new_v4(),
            company_id: company,
            title: "Onboarding".to_string(),
            content: "Steps for new customers".to_string(),
            source: Some("wiki".to_string()),
            similarity: 0.9,
        });
        let search = Arc::new(KnowledgeSearch::new(Arc::new(FixedEmbedder), repo));
        let h = harness_with(MockMetricRepo::default(), Some(search));

        let resp = build_router(h.state)
            .oneshot(search_request(
                company,
                serde_json::json!({ "query": "onboarding", "limit": 3 }),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_body(resp).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["title"], "Onboarding");
    }

    #[tokio::test]
    async fn knowledge_search_rejects_empty_query() {
        let search = Arc::new(KnowledgeSearch::new(
            Arc::new(FixedEmbedder),
            Arc::new(MockKnowledgeRepo::default()),
        ));
        let h = harness_with(MockMetricRepo::default(), Some(search));

        let resp = build_router(h.state)
            .oneshot(search_request(Uuid::new_v4(), serde_json::json!({ "query": "" })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
