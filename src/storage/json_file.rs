use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::models::{Account, CumulativeSnapshot, Id};

use super::{by_day, validate_account, SnapshotStore};

/// JSON file-based snapshot store.
///
/// Directory structure:
/// ```text
/// data/
///   accounts/
///     {id}/
///       account.json
///       snapshots.jsonl
/// ```
///
/// The snapshot file is an append log: the daily fetch job appends one line
/// per day, and reads collapse duplicate days with last write wins.
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn accounts_dir(&self) -> PathBuf {
        self.base_path.join("accounts")
    }

    fn account_dir(&self, id: &Id) -> PathBuf {
        self.accounts_dir().join(id.to_string())
    }

    fn account_file(&self, id: &Id) -> PathBuf {
        self.account_dir(id).join("account.json")
    }

    fn snapshots_file(&self, id: &Id) -> PathBuf {
        self.account_dir(id).join("snapshots.jsonl")
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create directory")?;
        }
        Ok(())
    }

    async fn read_json<T: for<'de> serde::Deserialize<'de>>(
        &self,
        path: &Path,
    ) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let value = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read file"),
        }
    }

    async fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_dir(path).await?;
        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        fs::write(path, content)
            .await
            .context("Failed to write file")?;
        Ok(())
    }

    async fn read_jsonl<T: for<'de> serde::Deserialize<'de>>(&self, path: &Path) -> Result<Vec<T>> {
        let file = match fs::File::open(path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Failed to open file"),
        };

        let reader = BufReader::new(file);
        let mut lines = reader.lines();
        let mut items = Vec::new();

        while let Some(line) = lines.next_line().await.context("Failed to read line")? {
            if line.trim().is_empty() {
                continue;
            }
            let item: T = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse JSONL line: {}", line))?;
            items.push(item);
        }

        Ok(items)
    }

    async fn append_jsonl<T: serde::Serialize>(&self, path: &Path, items: &[T]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        self.ensure_dir(path).await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .context("Failed to open file for append")?;

        for item in items {
            let line = serde_json::to_string(item).context("Failed to serialize item")?;
            file.write_all(line.as_bytes()).await?;
            file.write_all(b"\n").await?;
        }

        Ok(())
    }

    async fn list_account_ids(&self) -> Result<Vec<Id>> {
        let mut ids = Vec::new();

        let mut entries = match fs::read_dir(self.accounts_dir()).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(e).context("Failed to read directory"),
        };

        while let Some(entry) = entries.next_entry().await.context("Failed to read entry")? {
            if let Ok(file_type) = entry.file_type().await {
                if file_type.is_dir() {
                    if let Some(name) = entry.file_name().to_str() {
                        if let Ok(id) = Id::from_string_checked(name) {
                            ids.push(id);
                        }
                    }
                }
            }
        }

        Ok(ids)
    }

    async fn read_snapshots(&self, account_id: &Id) -> Result<Vec<CumulativeSnapshot>> {
        self.read_jsonl(&self.snapshots_file(account_id)).await
    }
}

#[async_trait::async_trait]
impl SnapshotStore for JsonFileStorage {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut ids = self.list_account_ids().await?;
        ids.sort();

        let mut accounts = Vec::new();
        for id in ids {
            if let Some(account) = self.get_account(&id).await? {
                accounts.push(account);
            }
        }

        Ok(accounts)
    }

    async fn get_account(&self, id: &Id) -> Result<Option<Account>> {
        self.read_json(&self.account_file(id)).await
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        validate_account(account)?;
        Id::from_string_checked(account.id.as_str())
            .with_context(|| format!("account id {} is not storable", account.id))?;
        self.write_json(&self.account_file(&account.id), account)
            .await
    }

    async fn delete_account(&self, id: &Id) -> Result<bool> {
        let dir = self.account_dir(id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete account dir {:?}", dir)),
        }
    }

    async fn append_snapshots(
        &self,
        account_id: &Id,
        snapshots: &[CumulativeSnapshot],
    ) -> Result<()> {
        self.append_jsonl(&self.snapshots_file(account_id), snapshots)
            .await
    }

    async fn find_snapshots(
        &self,
        account_id: &Id,
        days: &[NaiveDate],
    ) -> Result<Vec<CumulativeSnapshot>> {
        let deduped = by_day(self.read_snapshots(account_id).await?);
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
        let deduped = by_day(self.read_snapshots(account_id).await?);
        Ok(deduped
            .into_values()
            .filter(|s| s.day >= from && s.day <= to)
            .collect())
    }

    async fn latest_snapshot(&self, account_id: &Id) -> Result<Option<CumulativeSnapshot>> {
        let deduped = by_day(self.read_snapshots(account_id).await?);
        Ok(deduped.into_values().next_back())
    }
}
