use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A company-knowledge document returned by the vector match, with its
/// cosine similarity to the query embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeMatch {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub content: String,
    pub source: Option<String>,
    pub similarity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeQuery {
    pub company_id: Uuid,
    pub embedding: Vec<f32>,
    pub threshold: f64,
    pub limit: i64,
}
