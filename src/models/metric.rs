use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CumulativeSnapshot;

/// The counter a report is parameterized over.
///
/// Every analytics domain (followers, replies, boosts, ...) is a value of
/// this enum: it carries the snapshot field accessor, the negative-delta
/// clamp policy, and the CSV labels. Reporting code is written once against
/// `Metric` instead of once per domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Followers,
    Following,
    Statuses,
    Replies,
    Boosts,
    Favourites,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Followers,
        Metric::Following,
        Metric::Statuses,
        Metric::Replies,
        Metric::Boosts,
        Metric::Favourites,
    ];

    /// Read this metric's cumulative counter from a snapshot.
    pub fn value_of(self, snapshot: &CumulativeSnapshot) -> i64 {
        match self {
            Metric::Followers => snapshot.followers_count,
            Metric::Following => snapshot.following_count,
            Metric::Statuses => snapshot.statuses_count,
            Metric::Replies => snapshot.replies_count,
            Metric::Boosts => snapshot.boosts_count,
            Metric::Favourites => snapshot.favourites_count,
        }
    }

    /// Whether negative day-over-day deltas are clamped to zero.
    ///
    /// Toot engagement totals cannot legitimately shrink, so a drop there is
    /// an upstream data correction and renders as a 0 data point. Follower
    /// style counters can really go down; a net loss must stay visible.
    pub fn clamps_negative(self) -> bool {
        matches!(self, Metric::Replies | Metric::Boosts | Metric::Favourites)
    }

    /// Column header used in CSV exports.
    pub fn csv_header(self) -> &'static str {
        match self {
            Metric::Followers => "Followers",
            Metric::Following => "Following",
            Metric::Statuses => "Toots",
            Metric::Replies => "Replies",
            Metric::Boosts => "Boosts",
            Metric::Favourites => "Favourites",
        }
    }

    /// Filename stem for CSV exports.
    pub fn file_stem(self) -> &'static str {
        match self {
            Metric::Followers => "followers",
            Metric::Following => "following",
            Metric::Statuses => "toots",
            Metric::Replies => "replies",
            Metric::Boosts => "boosts",
            Metric::Favourites => "favourites",
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "followers" => Ok(Metric::Followers),
            "following" => Ok(Metric::Following),
            "statuses" | "toots" => Ok(Metric::Statuses),
            "replies" => Ok(Metric::Replies),
            "boosts" | "reblogs" => Ok(Metric::Boosts),
            "favourites" | "favorites" => Ok(Metric::Favourites),
            _ => Err(format!(
                "unknown metric: {s}. Use: followers, following, statuses, replies, boosts, favourites"
            )),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_policy_splits_engagement_from_follow_counters() {
        assert!(!Metric::Followers.clamps_negative());
        assert!(!Metric::Following.clamps_negative());
        assert!(!Metric::Statuses.clamps_negative());
        assert!(Metric::Replies.clamps_negative());
        assert!(Metric::Boosts.clamps_negative());
        assert!(Metric::Favourites.clamps_negative());
    }

    #[test]
    fn parses_common_spellings() {
        assert_eq!("followers".parse::<Metric>().unwrap(), Metric::Followers);
        assert_eq!("Favorites".parse::<Metric>().unwrap(), Metric::Favourites);
        assert_eq!("reblogs".parse::<Metric>().unwrap(), Metric::Boosts);
        assert!("engagement".parse::<Metric>().is_err());
    }
}
