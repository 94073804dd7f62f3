use std::collections::HashMap;

use chrono::{DateTime, Utc};
use pulse_db::metrics::models::{MetricSample, MetricValue};

#[derive(Debug, Clone, PartialEq)]
pub struct LatestValue {
    pub value: MetricValue,
    pub captured_at: DateTime<Utc>,
}

/// Reduce a batch of samples to the most recent reading per KPI key.
/// On equal timestamps the sample seen first wins.
pub fn latest_values(samples: &[MetricSample]) -> HashMap<String, LatestValue> {
    let mut latest: HashMap<String, LatestValue> = HashMap::new();

    for sample in samples {
        match latest.get(&sample.kpi_key) {
            Some(current) if current.captured_at >= sample.captured_at => {}
            _ => {
                latest.insert(
                    sample.kpi_key.clone(),
                    LatestValue {
                        value: sample.value.clone(),
                        captured_at: sample.captured_at,
                    },
                );
            }
        }
    }

    latest
}
