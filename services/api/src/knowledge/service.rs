use std::sync::Arc;

use pulse_common::error::{PulseError, PulseResult};
use pulse_db::knowledge::models::{KnowledgeMatch, KnowledgeQuery};
use pulse_db::knowledge::repositories::KnowledgeRepository;
use uuid::Uuid;

use super::embedding::Embedder;

pub const DEFAULT_LIMIT: i64 = 5;
pub const MAX_LIMIT: i64 = 50;
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// Similarity search over a company's knowledge documents.
pub struct KnowledgeSearch {
    embedder: Arc<dyn Embedder>,
    repo: Arc<dyn KnowledgeRepository>,
}

impl KnowledgeSearch {
    pub fn new(embedder: Arc<dyn Embedder>, repo: Arc<dyn KnowledgeRepository>) -> Self {
        Self { embedder, repo }
    }

    pub async fn search(
        &self,
        company_id: Uuid,
        query: &str,
        limit: Option<i64>,
        threshold: Option<f64>,
    ) -> PulseResult<Vec<KnowledgeMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PulseError::Validation("query must not be empty".to_string()));
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(PulseError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        let threshold = threshold.unwrap_or(DEFAULT_THRESHOLD);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PulseError::Validation(
                "threshold must be between 0 and 1".to_string(),
            ));
        }

        let embedding = self.embedder.embed(query).await?;

        let mut matches = self
            .repo
            .match_documents(KnowledgeQuery {
                company_id,
                embedding,
                threshold,
                limit,
            })
            .await?;
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        tracing::debug!(%company_id, results = matches.len(), "knowledge search complete");
        Ok(matches)
    }
}
