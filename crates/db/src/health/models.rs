use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::models::MetricValue;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum KpiCategory {
    Sales,
    Finance,
    Support,
    Marketing,
    Operations,
    Maturity,
}

impl KpiCategory {
    /// Fixed display and aggregation order.
    pub const ALL: [KpiCategory; 6] = [
        Self::Sales,
        Self::Finance,
        Self::Support,
        Self::Marketing,
        Self::Operations,
        Self::Maturity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Finance => "finance",
            Self::Support => "support",
            Self::Marketing => "marketing",
            Self::Operations => "operations",
            Self::Maturity => "maturity",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KpiScore {
    pub key: String,
    pub name: String,
    pub value: MetricValue,
    pub score: f64,
    pub weight: f64,
    pub category: KpiCategory,
    pub status: HealthStatus,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: KpiCategory,
    pub score: i32,
    pub weight: f64,
    pub kpis: Vec<KpiScore>,
    pub status: HealthStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthTrend {
    pub direction: TrendDirection,
    pub monthly_change: i32,
    pub weekly_change: i32,
}

impl HealthTrend {
    pub fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            monthly_change: 0,
            weekly_change: 0,
        }
    }
}

impl Default for HealthTrend {
    fn default() -> Self {
        Self::stable()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHealthScore {
    pub overall_score: i32,
    pub category_scores: Vec<CategoryScore>,
    pub kpi_scores: Vec<KpiScore>,
    pub last_calculated: DateTime<Utc>,
    pub data_quality: i32,
    pub recommendations: Vec<String>,
    pub trends: HealthTrend,
}

/// Persisted, append-only copy of a [`BusinessHealthScore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub overall_score: i32,
    pub data_quality: i32,
    pub category_scores: Vec<CategoryScore>,
    pub kpi_scores: Vec<KpiScore>,
    pub recommendations: Vec<String>,
    pub trends: HealthTrend,
    pub calculated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl HealthSnapshot {
    pub fn from_score(
        user_id: Uuid,
        score: &BusinessHealthScore,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            overall_score: score.overall_score,
            data_quality: score.data_quality,
            category_scores: score.category_scores.clone(),
            kpi_scores: score.kpi_scores.clone(),
            recommendations: score.recommendations.clone(),
            trends: score.trends,
            calculated_at: score.last_calculated,
            created_at,
        }
    }
}

/// The slice of a snapshot the trend calculation needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreHistoryPoint {
    pub overall_score: i32,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HealthSnapshotFilter {
    pub user_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
