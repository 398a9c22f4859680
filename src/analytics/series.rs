use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CumulativeSnapshot, Metric};

/// One day's delta, ready for charting or CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Calendar date the delta applies to (ISO in JSON/CSV).
    pub time: NaiveDate,
    pub value: i64,
}

/// Turn ascending cumulative snapshots into day-over-day deltas.
///
/// The first snapshot is baseline only (nothing to diff against), so a
/// caller wanting deltas for `[from, to]` must fetch `[from - 1 day, to]`.
/// Zero deltas are emitted: flat days are real chart points. Negative deltas
/// are clamped to zero when the metric's policy treats regressions as
/// upstream corrections rather than real losses.
pub fn build_delta_series(snapshots: &[CumulativeSnapshot], metric: Metric) -> Vec<ChartPoint> {
    snapshots
        .windows(2)
        .map(|pair| {
            let raw = metric.value_of(&pair[1]) - metric.value_of(&pair[0]);
            let value = if metric.clamps_negative() {
                raw.max(0)
            } else {
                raw
            };
            ChartPoint {
                time: pair[1].day,
                value,
            }
        })
        .collect()
}
