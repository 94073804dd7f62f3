use std::collections::HashMap;

use chrono::{DateTime, Utc};
use pulse_db::health::models::{BusinessHealthScore, CategoryScore, HealthTrend, KpiScore};

use crate::aggregate::{aggregate_categories, data_quality, overall_score};
use crate::definitions::KpiDefinition;
use crate::latest::LatestValue;
use crate::scorer::score_definition;

/// Everything about a health score that depends only on the metric readings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub kpi_scores: Vec<KpiScore>,
    pub category_scores: Vec<CategoryScore>,
    pub overall_score: i32,
    pub data_quality: i32,
}

/// Score every definition against the latest readings. Definitions without a
/// reading are scored as zero.
pub fn evaluate(definitions: &[KpiDefinition], latest: &HashMap<String, LatestValue>) -> ScoreCard {
    let kpi_scores: Vec<KpiScore> = definitions
        .iter()
        .map(|def| score_definition(def, latest.get(def.key)))
        .collect();
    let category_scores = aggregate_categories(&kpi_scores);
    let overall_score = overall_score(&category_scores);
    let data_quality = data_quality(&kpi_scores);

    ScoreCard {
        kpi_scores,
        category_scores,
        overall_score,
        data_quality,
    }
}

pub fn assemble(
    card: ScoreCard,
    trends: HealthTrend,
    recommendations: Vec<String>,
    calculated_at: DateTime<Utc>,
) -> BusinessHealthScore {
    BusinessHealthScore {
        overall_score: card.overall_score,
        category_scores: card.category_scores,
        kpi_scores: card.kpi_scores,
        last_calculated: calculated_at,
        data_quality: card.data_quality,
        recommendations,
        trends,
    }
}
