use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::knowledge::models::{KnowledgeMatch, KnowledgeQuery};
use crate::knowledge::repositories::KnowledgeRepository;
use pulse_common::error::{PulseError, PulseResult};

/// Delegates similarity search to the `match_company_knowledge` database
/// function (pgvector). Nothing is ranked locally.
#[derive(Clone)]
pub struct PgKnowledgeRepository {
    pool: PgPool,
}

impl PgKnowledgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KnowledgeRepository for PgKnowledgeRepository {
    async fn match_documents(&self, query: KnowledgeQuery) -> PulseResult<Vec<KnowledgeMatch>> {
        let rows = sqlx::query(
            "select id, company_id, title, content, source, similarity::float8 as similarity
             from match_company_knowledge($1::vector, $2, $3, $4)
             order by similarity desc",
        )
        .bind(vector_literal(&query.embedding))
        .bind(query.threshold)
        .bind(query.limit as i32)
        .bind(query.company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PulseError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| KnowledgeMatch {
                id: r.get("id"),
                company_id: r.get("company_id"),
                title: r.get("title"),
                content: r.get("content"),
                source: r.get("source"),
                similarity: r.get("similarity"),
            })
            .collect())
    }
}

/// pgvector text input format: `[0.1,0.2,0.3]`.
fn vector_literal(embedding: &[f32]) -> String {
    let parts: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}
