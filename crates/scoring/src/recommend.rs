use pulse_db::health::models::{CategoryScore, HealthStatus, KpiCategory, KpiScore};

pub const MAX_RECOMMENDATIONS: usize = 5;

/// Category score under which the weakest category gets a targeted message.
const FOCUS_THRESHOLD: i32 = 60;

pub const MAINTAIN_PERFORMANCE: &str = "Maintain current performance levels across all departments";
pub const ADD_INTEGRATIONS: &str =
    "Consider implementing additional data integrations for better insights";

/// Rule-based suggestions. Same inputs, same output.
pub fn generate_recommendations(
    kpi_scores: &[KpiScore],
    category_scores: &[CategoryScore],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    let mut by_score: Vec<&CategoryScore> = category_scores.iter().collect();
    by_score.sort_by_key(|c| c.score);
    if let Some(weakest) = by_score.first() {
        if weakest.score < FOCUS_THRESHOLD {
            recommendations.push(format!(
                "Focus on improving {} performance (current score: {})",
                category_label(weakest.category),
                weakest.score
            ));
        }
    }

    if let Some(poor) = kpi_scores.iter().find(|k| k.status == HealthStatus::Poor) {
        recommendations.push(format!(
            "Address {} - it is currently below the fair threshold and needs attention",
            poor.name
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(MAINTAIN_PERFORMANCE.to_string());
        recommendations.push(ADD_INTEGRATIONS.to_string());
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn category_label(category: KpiCategory) -> &'static str {
    match category {
        KpiCategory::Sales => "Sales",
        KpiCategory::Finance => "Finance",
        KpiCategory::Support => "Support",
        KpiCategory::Marketing => "Marketing",
        KpiCategory::Operations => "Operations",
        KpiCategory::Maturity => "Business Maturity",
    }
}
