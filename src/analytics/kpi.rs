use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CumulativeSnapshot, Id, Metric};
use crate::storage::SnapshotStore;

use super::local_day::local_today;
use super::period::Period;

/// Period-over-period KPI for one metric.
///
/// Fields are populated opportunistically: a new account without enough
/// snapshot history leaves them absent. Absent means "no data to show",
/// never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodKpi {
    /// Net change from the period start through yesterday.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_period: Option<i64>,
    /// Fraction of the period elapsed as of today, in `(0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_period_progress: Option<f64>,
    /// Net change across the whole previous period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_period: Option<i64>,
    /// True when today is the period boundary and the KPI was computed for
    /// the period that just ended instead of a zero-length current period.
    #[serde(default)]
    pub is_last_period: bool,
    /// Signed fractional change vs. the previous period; see [`kpi_trend`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<f64>,
}

/// Compute a period KPI from cumulative daily snapshots.
///
/// Exactly three day keys are consulted: yesterday (the period end), the day
/// before the period start (the cumulative baseline), and the day before the
/// previous period start. The current delta needs the first two; the
/// previous delta needs all three. Whatever is missing leaves the matching
/// fields `None`.
pub async fn period_kpi(
    store: &dyn SnapshotStore,
    account_id: &Id,
    tz: Tz,
    period: Period,
    metric: Metric,
    reference: DateTime<Utc>,
) -> Result<PeriodKpi> {
    let mut days_to_start = period.days_to_start(tz, 0, reference);
    let mut modifier = 0;
    let mut is_last_period = false;
    if days_to_start == 0 {
        // Today is the boundary. A zero-length "current period" would be
        // meaningless, so report on the period that just ended.
        modifier = -1;
        days_to_start = period.days_to_start(tz, modifier, reference);
        is_last_period = true;
    }

    let today = local_today(tz, reference);
    let period_end = today - Duration::days(1);
    let baseline = today - Duration::days(days_to_start + 1);
    let prev_baseline =
        today - Duration::days(period.days_to_start(tz, modifier - 1, reference) + 1);

    let by_day: HashMap<NaiveDate, CumulativeSnapshot> = store
        .find_snapshots(account_id, &[prev_baseline, baseline, period_end])
        .await?
        .into_iter()
        .map(|snapshot| (snapshot.day, snapshot))
        .collect();

    let mut kpi = PeriodKpi {
        is_last_period,
        ..PeriodKpi::default()
    };

    if let (Some(end), Some(start)) = (by_day.get(&period_end), by_day.get(&baseline)) {
        kpi.current_period = Some(metric.value_of(end) - metric.value_of(start));

        let period_len = days_to_start - period.days_to_start(tz, modifier + 1, reference);
        if period_len != 0 {
            kpi.current_period_progress = Some(days_to_start as f64 / period_len as f64);
        }

        if let Some(prev_start) = by_day.get(&prev_baseline) {
            kpi.previous_period = Some(metric.value_of(start) - metric.value_of(prev_start));
        }
    } else {
        debug!(
            account = %account_id,
            %period_end,
            %baseline,
            "insufficient snapshots for period KPI"
        );
    }

    kpi.trend = kpi_trend(&kpi);
    Ok(kpi)
}

/// Signed fractional change between current and previous period.
///
/// `None` when either period is absent or the previous nets to zero. The
/// divisor is the absolute previous value so a sign flip (net loss followed
/// by net gain) still yields a correctly signed magnitude.
pub fn kpi_trend(kpi: &PeriodKpi) -> Option<f64> {
    let current = kpi.current_period?;
    let previous = kpi.previous_period?;
    if previous == 0 {
        return None;
    }
    Some((current - previous) as f64 / previous.abs() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(current: Option<i64>, previous: Option<i64>) -> PeriodKpi {
        PeriodKpi {
            current_period: current,
            previous_period: previous,
            ..PeriodKpi::default()
        }
    }

    #[test]
    fn trend_is_fractional_change() {
        assert_eq!(kpi_trend(&kpi(Some(25), Some(20))), Some(0.25));
        assert_eq!(kpi_trend(&kpi(Some(10), Some(20))), Some(-0.5));
    }

    #[test]
    fn trend_undefined_without_both_periods_or_with_zero_previous() {
        assert_eq!(kpi_trend(&kpi(Some(10), Some(0))), None);
        assert_eq!(kpi_trend(&kpi(Some(10), None)), None);
        assert_eq!(kpi_trend(&kpi(None, Some(10))), None);
    }

    #[test]
    fn trend_divides_by_absolute_previous_on_sign_flips() {
        // Losing less than before is an improvement: +0.5.
        assert_eq!(kpi_trend(&kpi(Some(-5), Some(-10))), Some(0.5));
        // Recovering from a loss to a gain stays positive.
        assert_eq!(kpi_trend(&kpi(Some(10), Some(-10))), Some(2.0));
        // Sliding from a gain into a loss stays negative.
        assert_eq!(kpi_trend(&kpi(Some(-10), Some(10))), Some(-2.0));
    }

    #[test]
    fn absent_kpi_fields_skip_serialization() {
        let json = serde_json::to_string(&kpi(Some(3), None)).unwrap();
        assert!(json.contains("current_period"));
        assert!(!json.contains("previous_period"));
        assert!(!json.contains("trend"));
    }
}
