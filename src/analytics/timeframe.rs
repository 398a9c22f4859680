use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::local_day::day_instant;
use super::period::Period;

/// Named reporting window for charts and CSV exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Last30Days,
    ThisWeek,
    ThisMonth,
    ThisYear,
    LastWeek,
    LastMonth,
    LastYear,
}

impl Timeframe {
    /// Parse a timeframe token from a request.
    ///
    /// Unknown or missing tokens fall back to the 30-day default instead of
    /// erroring; a stale dashboard link must not break the whole report.
    pub fn parse_or_default(token: Option<&str>) -> Self {
        match token {
            None => Timeframe::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                debug!(token = raw, "unknown timeframe token, using last30days");
                Timeframe::default()
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Last30Days => "last30days",
            Timeframe::ThisWeek => "thisweek",
            Timeframe::ThisMonth => "thismonth",
            Timeframe::ThisYear => "thisyear",
            Timeframe::LastWeek => "lastweek",
            Timeframe::LastMonth => "lastmonth",
            Timeframe::LastYear => "lastyear",
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last30days" => Ok(Timeframe::Last30Days),
            "thisweek" => Ok(Timeframe::ThisWeek),
            "thismonth" => Ok(Timeframe::ThisMonth),
            "thisyear" => Ok(Timeframe::ThisYear),
            "lastweek" => Ok(Timeframe::LastWeek),
            "lastmonth" => Ok(Timeframe::LastMonth),
            "lastyear" => Ok(Timeframe::LastYear),
            _ => Err(format!("unknown timeframe: {s}")),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete day-instant range for a timeframe.
///
/// Both bounds are local-midnight instants in the account's zone; `date_to`
/// is inclusive (the last day the range covers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeframeRange {
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub timeframe: Timeframe,
}

/// Resolve a timeframe to day instants in `tz`.
pub fn resolve_timeframe(tz: Tz, timeframe: Timeframe, reference: DateTime<Utc>) -> TimeframeRange {
    let (from_days, to_days) = match timeframe {
        Timeframe::Last30Days => (30, 0),
        Timeframe::ThisWeek => (Period::Week.days_to_start(tz, 0, reference), 0),
        Timeframe::ThisMonth => (Period::Month.days_to_start(tz, 0, reference), 0),
        Timeframe::ThisYear => (Period::Year.days_to_start(tz, 0, reference), 0),
        // "Last" frames end the day before the current period starts.
        Timeframe::LastWeek => (
            Period::Week.days_to_start(tz, -1, reference),
            Period::Week.days_to_start(tz, 0, reference) + 1,
        ),
        Timeframe::LastMonth => (
            Period::Month.days_to_start(tz, -1, reference),
            Period::Month.days_to_start(tz, 0, reference) + 1,
        ),
        Timeframe::LastYear => (
            Period::Year.days_to_start(tz, -1, reference),
            Period::Year.days_to_start(tz, 0, reference) + 1,
        ),
    };
    TimeframeRange {
        date_from: day_instant(tz, from_days, reference),
        date_to: day_instant(tz, to_days, reference),
        timeframe,
    }
}
