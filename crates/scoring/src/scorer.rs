use pulse_db::health::models::{HealthStatus, KpiScore};
use pulse_db::metrics::models::MetricValue;

use crate::definitions::KpiDefinition;
use crate::latest::LatestValue;

/// Score a raw reading against a definition, 0-100.
///
/// A missing reading is scored as the number 0. Flags score 100 or 0 no
/// matter the thresholds. Text is parsed only for definitions that accept
/// it; anything else, or text that does not parse, scores 0.
pub fn score_kpi(definition: &KpiDefinition, value: Option<&MetricValue>) -> f64 {
    match value {
        None => score_numeric(definition, 0.0),
        Some(MetricValue::Flag(true)) => 100.0,
        Some(MetricValue::Flag(false)) => 0.0,
        Some(MetricValue::Number(n)) => score_numeric(definition, *n),
        Some(MetricValue::Text(text)) if definition.text_valued => {
            parse_text(text).map_or(0.0, |n| score_numeric(definition, n))
        }
        Some(MetricValue::Text(_)) => 0.0,
    }
}

/// Tier comparison. Below the fair tier the score decays linearly from 40
/// with the relative distance to the fair cutoff.
fn score_numeric(definition: &KpiDefinition, value: f64) -> f64 {
    let KpiDefinition {
        excellent_threshold: excellent,
        good_threshold: good,
        fair_threshold: fair,
        ..
    } = *definition;

    if definition.inverse {
        if value <= excellent {
            100.0
        } else if value <= good {
            80.0
        } else if value <= fair {
            60.0
        } else {
            below_fair(value - fair, fair)
        }
    } else if value >= excellent {
        100.0
    } else if value >= good {
        80.0
    } else if value >= fair {
        60.0
    } else {
        below_fair(fair - value, fair)
    }
}

/// A zero fair cutoff has no scale to decay against; such readings score 0.
fn below_fair(distance: f64, fair: f64) -> f64 {
    if fair == 0.0 {
        return 0.0;
    }
    (40.0 - (distance / fair) * 20.0).clamp(0.0, 40.0)
}

fn parse_text(text: &str) -> Option<f64> {
    text.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// The tier a score landed in.
pub fn kpi_status(score: f64) -> HealthStatus {
    if score >= 100.0 {
        HealthStatus::Excellent
    } else if score >= 80.0 {
        HealthStatus::Good
    } else if score >= 60.0 {
        HealthStatus::Fair
    } else {
        HealthStatus::Poor
    }
}

pub fn score_definition(definition: &KpiDefinition, latest: Option<&LatestValue>) -> KpiScore {
    let score = score_kpi(definition, latest.map(|l| &l.value));

    KpiScore {
        key: definition.key.to_string(),
        name: definition.name.to_string(),
        value: latest.map(|l| l.value.clone()).unwrap_or_default(),
        score,
        weight: definition.weight,
        category: definition.category,
        status: kpi_status(score),
        last_updated: latest.map(|l| l.captured_at),
    }
}

/// Whether a reading counts as recorded data for the data-quality ratio.
pub fn has_data(value: &MetricValue) -> bool {
    match value {
        MetricValue::Flag(b) => *b,
        MetricValue::Number(n) => *n != 0.0,
        MetricValue::Text(text) => match parse_text(text) {
            Some(n) => n != 0.0,
            None => !text.trim().is_empty(),
        },
    }
}
