use std::time::Duration;

use async_trait::async_trait;
use pulse_common::error::{PulseError, PulseResult};
use pulse_config::optional_var_or;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::upstream::{send_with_retry, UpstreamError};

/// Turns text into a vector for similarity search.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> PulseResult<Vec<f32>>;
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("EMBEDDING_BASE_URL").ok()?;
        let api_key = std::env::var("EMBEDDING_API_KEY").ok()?;
        let model = std::env::var("EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-3-small".to_string());

        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            max_retries: optional_var_or("EMBEDDING_MAX_RETRIES", 3),
            timeout_secs: optional_var_or("EMBEDDING_TIMEOUT_SECS", 15),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error(transparent)]
    Client(#[from] UpstreamError),

    #[error("embedding response contained no vector")]
    EmptyEmbedding,
}

impl From<EmbeddingError> for PulseError {
    fn from(err: EmbeddingError) -> Self {
        PulseError::Upstream(format!("embedding: {err}"))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    config: EmbeddingConfig,
}

impl EmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Result<Self, reqwest::Error> {
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

    pub async fn create_embedding(&self, input: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/v1/embeddings", self.config.base_url);
        let request = EmbeddingRequest {
            model: &self.config.model,
            input,
        };

        let response = send_with_retry("embedding", self.config.max_retries, || {
            self.client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&request)
        })
        .await?;

        let body = response
            .json::<EmbeddingResponse>()
            .await
            .map_err(UpstreamError::from)?;
        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
            .ok_or(EmbeddingError::EmptyEmbedding)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> PulseResult<Vec<f32>> {
        Ok(self.create_embedding(text).await?)
    }
}
