use pulse_db::knowledge::models::KnowledgeMatch;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct KnowledgeSearchResponse {
    pub data: Vec<KnowledgeMatch>,
    pub count: usize,
}
