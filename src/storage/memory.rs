//! In-memory store implementation for tests and demos.

use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::models::{Account, CumulativeSnapshot, Id};

use super::{by_day, validate_account, SnapshotStore};

/// In-memory snapshot store.
pub struct MemoryStorage {
    accounts: Mutex<HashMap<Id, Account>>,
    snapshots: Mutex<HashMap<Id, Vec<CumulativeSnapshot>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            snapshots: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for MemoryStorage {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.lock().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn get_account(&self, id: &Id) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.get(id).cloned())
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        validate_account(account)?;
        let mut accounts = self.accounts.lock().await;
        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn delete_account(&self, id: &Id) -> Result<bool> {
        let mut accounts = self.accounts.lock().await;
        self.snapshots.lock().await.remove(id);
        Ok(accounts.remove(id).is_some())
    }

    async fn append_snapshots(
        &self,
        account_id: &Id,
        snapshots: &[CumulativeSnapshot],
    ) -> Result<()> {
        let mut all = self.snapshots.lock().await;
        all.entry(account_id.clone())
            .or_default()
            .extend(snapshots.iter().cloned());
        Ok(())
    }

    async fn find_snapshots(
        &self,
        account_id: &Id,
        days: &[NaiveDate],
    ) -> Result<Vec<CumulativeSnapshot>> {
        let all = self.snapshots.lock().await;
        let deduped = by_day(all.get(account_id).cloned().unwrap_or_default());
        let mut found: Vec<CumulativeSnapshot> = days
            .iter()
            .filter_map(|day| deduped.get(day).cloned())
            .collect();
        found.sort_by(|a, b| b.day.cmp(&a.day));
        found.dedup_by_key(|s| s.day);
        Ok(found)
    }

    async fn find_snapshots_in_range(
        &self,
        account_id: &Id,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CumulativeSnapshot>> {
        let all = self.snapshots.lock().await;
        let deduped = by_day(all.get(account_id).cloned().unwrap_or_default());
        Ok(deduped
            .into_values()
            .filter(|s| s.day >= from && s.day <= to)
            .collect())
    }

    async fn latest_snapshot(&self, account_id: &Id) -> Result<Option<CumulativeSnapshot>> {
        let all = self.snapshots.lock().await;
        let deduped = by_day(all.get(account_id).cloned().unwrap_or_default());
        Ok(deduped.into_values().next_back())
    }
}
