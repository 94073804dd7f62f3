use pulse_db::health::models::{CategoryScore, HealthStatus, KpiCategory, KpiScore};

use crate::round_half_up;
use crate::scorer::has_data;

/// Fixed importance of each category in the overall score.
pub fn category_weight(category: KpiCategory) -> f64 {
    match category {
        KpiCategory::Sales => 1.0,
        KpiCategory::Finance => 1.0,
        KpiCategory::Support => 0.8,
        KpiCategory::Marketing => 0.9,
        KpiCategory::Operations => 0.8,
        KpiCategory::Maturity => 0.7,
    }
}

/// Category banding is global, unlike the per-KPI tiers.
pub fn category_status(score: i32) -> HealthStatus {
    if score >= 90 {
        HealthStatus::Excellent
    } else if score >= 75 {
        HealthStatus::Good
    } else if score >= 60 {
        HealthStatus::Fair
    } else {
        HealthStatus::Poor
    }
}

/// Weighted average of KPI scores per category, in [`KpiCategory::ALL`]
/// order. Categories without KPIs are left out.
pub fn aggregate_categories(kpi_scores: &[KpiScore]) -> Vec<CategoryScore> {
    KpiCategory::ALL
        .iter()
        .filter_map(|&category| {
            let kpis: Vec<KpiScore> = kpi_scores
                .iter()
                .filter(|k| k.category == category)
                .cloned()
                .collect();
            if kpis.is_empty() {
                return None;
            }

            let weight_sum: f64 = kpis.iter().map(|k| k.weight).sum();
            let weighted: f64 = kpis.iter().map(|k| k.score * k.weight).sum();
            let score = if weight_sum > 0.0 {
                round_half_up(weighted / weight_sum)
            } else {
                0
            };

            Some(CategoryScore {
                category,
                score,
                weight: category_weight(category),
                kpis,
                status: category_status(score),
            })
        })
        .collect()
}

pub fn overall_score(category_scores: &[CategoryScore]) -> i32 {
    let weight_sum: f64 = category_scores.iter().map(|c| c.weight).sum();
    if weight_sum <= 0.0 {
        return 0;
    }
    let weighted: f64 = category_scores
        .iter()
        .map(|c| c.score as f64 * c.weight)
        .sum();
    round_half_up(weighted / weight_sum)
}

/// Percentage of KPIs that carry recorded, non-zero data.
pub fn data_quality(kpi_scores: &[KpiScore]) -> i32 {
    if kpi_scores.is_empty() {
        return 0;
    }
    let with_data = kpi_scores.iter().filter(|k| has_data(&k.value)).count();
    round_half_up(with_data as f64 / kpi_scores.len() as f64 * 100.0)
}
