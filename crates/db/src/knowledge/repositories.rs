use async_trait::async_trait;

use crate::knowledge::models::{KnowledgeMatch, KnowledgeQuery};
use pulse_common::error::PulseResult;

#[async_trait]
pub trait KnowledgeRepository: Send + Sync {
    /// Documents whose similarity to `query.embedding` is at least
    /// `query.threshold`, best match first.
    async fn match_documents(&self, query: KnowledgeQuery) -> PulseResult<Vec<KnowledgeMatch>>;
}
