//! Timezone-aware period resolution and KPI/trend calculations.
//!
//! Everything in here is a pure computation over already-fetched inputs;
//! the only I/O is the snapshot lookup performed through the store handle
//! passed into [`period_kpi`]. Every entry point takes an explicit reference
//! instant so callers control "now".

mod kpi;
mod local_day;
mod period;
mod series;
mod timeframe;

pub use kpi::{kpi_trend, period_kpi, PeriodKpi};
pub use local_day::{
    day_instant, local_day_of, local_midnight, local_today, resolve_zone, TimezoneError,
};
pub use period::Period;
pub use series::{build_delta_series, ChartPoint};
pub use timeframe::{resolve_timeframe, Timeframe, TimeframeRange};
