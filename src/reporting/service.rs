use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::analytics::{
    build_delta_series, local_day_of, period_kpi, resolve_timeframe, resolve_zone, ChartPoint,
    Period, PeriodKpi, Timeframe,
};
use crate::models::{Account, Metric, TotalSnapshot};
use crate::storage::SnapshotStore;

use super::csv::{render_csv, CsvExport};

/// KPI boxes for one metric: week/month/year plus the running total.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    pub week: PeriodKpi,
    pub month: PeriodKpi,
    pub year: PeriodKpi,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalSnapshot>,
}

/// Reporting facade shared by every analytics domain.
///
/// The dashboard's follower, reply, boost and favourite surfaces are all
/// calls into this one service with a different [`Metric`]; nothing here is
/// metric-specific beyond that parameter.
pub struct ReportService {
    storage: Arc<dyn SnapshotStore>,
}

impl ReportService {
    pub fn new(storage: Arc<dyn SnapshotStore>) -> Self {
        Self { storage }
    }

    /// KPI for one period, with the trend ratio filled in.
    pub async fn period_kpi(
        &self,
        account: &Account,
        period: Period,
        metric: Metric,
        reference: DateTime<Utc>,
    ) -> Result<PeriodKpi> {
        let tz = resolve_zone(&account.timezone)?;
        period_kpi(
            self.storage.as_ref(),
            &account.id,
            tz,
            period,
            metric,
            reference,
        )
        .await
    }

    /// All KPI boxes for one metric.
    pub async fn kpi_report(
        &self,
        account: &Account,
        metric: Metric,
        reference: DateTime<Utc>,
    ) -> Result<KpiReport> {
        Ok(KpiReport {
            week: self
                .period_kpi(account, Period::Week, metric, reference)
                .await?,
            month: self
                .period_kpi(account, Period::Month, metric, reference)
                .await?,
            year: self
                .period_kpi(account, Period::Year, metric, reference)
                .await?,
            total: self.total(account, metric).await?,
        })
    }

    /// Chart-ready delta series for the account over a named timeframe.
    ///
    /// Points are ascending by day and cover at most `[date_from, date_to]`;
    /// days without a snapshot predecessor produce no point.
    pub async fn chart(
        &self,
        account: &Account,
        metric: Metric,
        timeframe: Timeframe,
        reference: DateTime<Utc>,
    ) -> Result<Vec<ChartPoint>> {
        let tz = resolve_zone(&account.timezone)?;
        let range = resolve_timeframe(tz, timeframe, reference);
        let from_day = local_day_of(tz, range.date_from);
        let to_day = local_day_of(tz, range.date_to);

        // One extra day of history so the first requested day has a
        // predecessor to diff against.
        let snapshots = self
            .storage
            .find_snapshots_in_range(&account.id, from_day - Duration::days(1), to_day)
            .await?;
        debug!(
            account = %account.id,
            %metric,
            timeframe = %range.timeframe,
            snapshots = snapshots.len(),
            "building delta series"
        );

        Ok(build_delta_series(&snapshots, metric))
    }

    /// Latest known cumulative value for the metric.
    pub async fn total(
        &self,
        account: &Account,
        metric: Metric,
    ) -> Result<Option<TotalSnapshot>> {
        let latest = self.storage.latest_snapshot(&account.id).await?;
        Ok(latest.map(|snapshot| TotalSnapshot {
            amount: metric.value_of(&snapshot),
            day: snapshot.day,
        }))
    }

    /// CSV export of the chart series.
    pub async fn csv_export(
        &self,
        account: &Account,
        metric: Metric,
        timeframe: Timeframe,
        reference: DateTime<Utc>,
    ) -> Result<CsvExport> {
        let points = self.chart(account, metric, timeframe, reference).await?;
        Ok(render_csv(metric, timeframe, &points))
    }
}
