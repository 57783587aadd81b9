//! Implements ReportLedger using a JSON file.
//!
//! One entry per chat key: the last ISO date a report was received.
//! Overwritten, never appended.

use crate::adapters::persistence::json_file;
use crate::domain::{ChatKey, DomainError};
use crate::ports::ReportLedger;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;

type ReportMap = HashMap<ChatKey, NaiveDate>;

/// JSON file-backed report ledger.
pub struct ReportsJson {
    path: std::path::PathBuf,
    cache: tokio::sync::RwLock<ReportMap>,
}

impl ReportsJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: tokio::sync::RwLock::new(ReportMap::default()),
        }
    }

    /// Load from disk. Call after construction.
    pub async fn load(&self) -> Result<(), DomainError> {
        *self.cache.write().await = json_file::load_or_default(&self.path).await;
        Ok(())
    }

    async fn save(&self) -> Result<(), DomainError> {
        let cache = self.cache.read().await;
        json_file::save_atomic(&self.path, &*cache).await
    }
}

#[async_trait::async_trait]
impl ReportLedger for ReportsJson {
    async fn record_report(&self, key: &ChatKey, date: NaiveDate) -> Result<(), DomainError> {
        {
            let mut cache = self.cache.write().await;
            cache.insert(*key, date);
        }
        self.save().await
    }

    async fn has_reported_on(&self, key: &ChatKey, date: NaiveDate) -> Result<bool, DomainError> {
        Ok(self.cache.read().await.get(key) == Some(&date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn record_overwrites_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.json");
        let key = ChatKey::chat(100);

        let ledger = ReportsJson::new(&path);
        ledger.load().await.unwrap();
        ledger.record_report(&key, date(2024, 1, 3)).await.unwrap();
        ledger.record_report(&key, date(2024, 1, 4)).await.unwrap();

        assert!(ledger.has_reported_on(&key, date(2024, 1, 4)).await.unwrap());
        // Overwritten, not appended: the old date no longer counts
        assert!(!ledger.has_reported_on(&key, date(2024, 1, 3)).await.unwrap());

        let reopened = ReportsJson::new(&path);
        reopened.load().await.unwrap();
        assert!(reopened
            .has_reported_on(&key, date(2024, 1, 4))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn unknown_key_has_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ReportsJson::new(dir.path().join("reports.json"));
        ledger.load().await.unwrap();
        assert!(!ledger
            .has_reported_on(&ChatKey::chat(1), date(2024, 1, 1))
            .await
            .unwrap());
    }
}
