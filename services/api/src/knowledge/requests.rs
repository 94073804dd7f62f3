use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct KnowledgeSearchRequest {
    pub query: String,
    pub limit: Option<i64>,
    pub threshold: Option<f64>,
}
