use pulse_db::health::models::{HealthTrend, ScoreHistoryPoint, TrendDirection};

use crate::round_half_up;

/// Change beyond which the trend is no longer stable.
const TREND_BAND: i32 = 5;

/// Direction and size of the change between the two most recent scores.
///
/// `history` is newest first. The weekly change is the monthly change over
/// four, not a measurement over elapsed time.
pub fn compute_trend(history: &[ScoreHistoryPoint]) -> HealthTrend {
    let (current, previous) = match history {
        [current, previous, ..] => (current, previous),
        _ => return HealthTrend::stable(),
    };

    let monthly_change = current.overall_score - previous.overall_score;
    let weekly_change = round_half_up(monthly_change as f64 / 4.0);
    let direction = if monthly_change > TREND_BAND {
        TrendDirection::Up
    } else if monthly_change < -TREND_BAND {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    HealthTrend {
        direction,
        monthly_change,
        weekly_change,
    }
}
