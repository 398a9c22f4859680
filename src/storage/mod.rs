mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::{Account, CumulativeSnapshot, Id};

/// Store of accounts and their daily cumulative snapshots.
///
/// Snapshots are keyed by (account, local day): at most one snapshot per day
/// per account. When a re-run fetch job appends a duplicate day, the last
/// write wins on read.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<Account>>;
    async fn get_account(&self, id: &Id) -> Result<Option<Account>>;
    /// Persist an account. Fails if its timezone does not resolve: a bad
    /// zone would corrupt every day boundary derived for the account.
    async fn save_account(&self, account: &Account) -> Result<()>;
    async fn delete_account(&self, id: &Id) -> Result<bool>;

    async fn append_snapshots(
        &self,
        account_id: &Id,
        snapshots: &[CumulativeSnapshot],
    ) -> Result<()>;

    /// Fetch snapshots for exactly these day keys, newest first.
    ///
    /// Days with no snapshot are simply absent from the result; an unknown
    /// account yields an empty result.
    async fn find_snapshots(
        &self,
        account_id: &Id,
        days: &[NaiveDate],
    ) -> Result<Vec<CumulativeSnapshot>>;

    /// Fetch all snapshots with `from <= day <= to`, ascending by day.
    async fn find_snapshots_in_range(
        &self,
        account_id: &Id,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CumulativeSnapshot>>;

    /// The most recent snapshot for the account, if any.
    async fn latest_snapshot(&self, account_id: &Id) -> Result<Option<CumulativeSnapshot>>;
}

/// Collapse an append log into one snapshot per day, last write wins.
pub(crate) fn by_day(snapshots: Vec<CumulativeSnapshot>) -> BTreeMap<NaiveDate, CumulativeSnapshot> {
    let mut map = BTreeMap::new();
    for snapshot in snapshots {
        map.insert(snapshot.day, snapshot);
    }
    map
}

/// Shared guard for [`SnapshotStore::save_account`] implementations.
pub(crate) fn validate_account(account: &Account) -> Result<()> {
    use anyhow::Context;
    crate::analytics::resolve_zone(&account.timezone)
        .with_context(|| format!("account {} has an invalid timezone", account.id))?;
    Ok(())
}
