use std::time::Duration;

use async_trait::async_trait;
use pulse_common::error::{PulseError, PulseResult};
use pulse_config::optional_var_or;
use pulse_db::health::models::{HealthStatus, KpiCategory};
use pulse_scoring::recommend::MAX_RECOMMENDATIONS;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::recommend::{RecommendationInput, RecommendationSource};
use crate::upstream::{send_with_retry, UpstreamError};

#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    pub base_url: String,
    pub api_key: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl RecommenderConfig {
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("RECOMMENDER_BASE_URL").ok()?;
        let api_key = std::env::var("RECOMMENDER_API_KEY").ok()?;

        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            max_retries: optional_var_or("RECOMMENDER_MAX_RETRIES", 2),
            timeout_secs: optional_var_or("RECOMMENDER_TIMEOUT_SECS", 20),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategorySummary {
    category: KpiCategory,
    score: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PoorKpi<'a> {
    key: &'a str,
    name: &'a str,
    score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationRequest<'a> {
    overall_score: i32,
    category_scores: Vec<CategorySummary>,
    poor_kpis: Vec<PoorKpi<'a>>,
    max_recommendations: usize,
}

impl<'a> RecommendationRequest<'a> {
    fn from_input(input: &'a RecommendationInput) -> Self {
        Self {
            overall_score: input.overall_score,
            category_scores: input
                .category_scores
                .iter()
                .map(|c| CategorySummary {
                    category: c.category,
                    score: c.score,
                })
                .collect(),
            poor_kpis: input
                .kpi_scores
                .iter()
                .filter(|k| k.status == HealthStatus::Poor)
                .map(|k| PoorKpi {
                    key: &k.key,
                    name: &k.name,
                    score: k.score,
                })
                .collect(),
            max_recommendations: MAX_RECOMMENDATIONS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationResponse {
    recommendations: Vec<String>,
}

/// Recommendations from an external model endpoint.
#[derive(Clone)]
pub struct ModelRecommendations {
    client: Client,
    config: RecommenderConfig,
}

impl ModelRecommendations {
    pub fn new(config: RecommenderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    pub async fn fetch(&self, input: &RecommendationInput) -> Result<Vec<String>, UpstreamError> {
        let url = format!("{}/v1/recommendations", self.config.base_url);
        let request = RecommendationRequest::from_input(input);

        let response = send_with_retry("recommender", self.config.max_retries, || {
            self.client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&request)
        })
        .await?;

        let mut body = response.json::<RecommendationResponse>().await?;
        body.recommendations.retain(|r| !r.trim().is_empty());
        body.recommendations.truncate(MAX_RECOMMENDATIONS);
        Ok(body.recommendations)
    }
}

#[async_trait]
impl RecommendationSource for ModelRecommendations {
    async fn recommend(&self, input: &RecommendationInput) -> PulseResult<Vec<String>> {
        self.fetch(input)
            .await
            .map_err(|e| PulseError::Upstream(format!("recommender: {e}")))
    }
}
