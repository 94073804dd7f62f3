use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::metrics::models::MetricSample;
use pulse_common::error::PulseResult;

#[async_trait]
pub trait MetricRepository: Send + Sync {
    /// All samples for a user captured at or after `since`, newest first.
    async fn list_samples_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> PulseResult<Vec<MetricSample>>;
}
