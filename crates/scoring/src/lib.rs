pub mod aggregate;
pub mod definitions;
pub mod engine;
pub mod latest;
pub mod recommend;
pub mod scorer;
pub mod trend;

pub use definitions::{KpiDefinition, KpiUnit, KPI_DEFINITIONS};
pub use engine::{assemble, evaluate, ScoreCard};
pub use latest::{latest_values, LatestValue};
pub use recommend::generate_recommendations;
pub use scorer::score_kpi;
pub use trend::compute_trend;

/// Rounds half toward positive infinity, so -2.5 becomes -2 and 2.5 becomes 3.
pub(crate) fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
