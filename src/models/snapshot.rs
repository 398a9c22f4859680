use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's cumulative counters for an account.
///
/// Written once per account per local day by the external fetch job; this
/// engine only ever reads them. Counters are running totals, not per-day
/// deltas. Upstream corrections can make a later snapshot smaller than an
/// earlier one, which readers must tolerate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeSnapshot {
    /// Timezone-normalized day key: the account's local calendar date.
    pub day: NaiveDate,
    pub followers_count: i64,
    pub following_count: i64,
    pub statuses_count: i64,
    #[serde(default)]
    pub replies_count: i64,
    #[serde(default)]
    pub boosts_count: i64,
    #[serde(default)]
    pub favourites_count: i64,
}

impl CumulativeSnapshot {
    /// Zeroed snapshot for a day; tests and fixtures fill in counters.
    pub fn on_day(day: NaiveDate) -> Self {
        Self {
            day,
            followers_count: 0,
            following_count: 0,
            statuses_count: 0,
            replies_count: 0,
            boosts_count: 0,
            favourites_count: 0,
        }
    }
}

/// Latest known cumulative value for one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalSnapshot {
    pub amount: i64,
    pub day: NaiveDate,
}
