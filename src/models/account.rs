use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

/// A connected Mastodon account tracked by the dashboard.
///
/// The timezone is an IANA zone name chosen at account setup and drives all
/// day-boundary math for this account's analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Id,
    /// Fully qualified handle, e.g. `crafts@mastodon.social`.
    pub acct: String,
    #[serde(default)]
    pub display_name: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

impl Account {
    pub fn new(id: Id, acct: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            id,
            acct: acct.into(),
            display_name: String::new(),
            timezone: timezone.into(),
            created_at: Utc::now(),
            active: true,
        }
    }

    /// Construct with an explicit creation timestamp, for deterministic tests.
    pub fn new_with(
        id: Id,
        created_at: DateTime<Utc>,
        acct: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            created_at,
            ..Self::new(id, acct, timezone)
        }
    }
}
