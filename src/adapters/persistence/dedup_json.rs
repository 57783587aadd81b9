//! Implements DedupTracker using a JSON file.
//!
//! The mark set survives restarts, so a report or ping before a crash still
//! suppresses the same day's sweep afterwards. Marks from past days are
//! pruned at load; only same-day marks are ever queried.

use crate::adapters::persistence::json_file;
use crate::domain::{ChatKey, DomainError};
use crate::ports::DedupTracker;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// One consumed (chat key, ISO date) notification slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct Mark {
    key: ChatKey,
    date: NaiveDate,
}

/// JSON file-backed daily dedup marks.
pub struct DedupJson {
    path: std::path::PathBuf,
    cache: tokio::sync::RwLock<HashSet<Mark>>,
}

impl DedupJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: tokio::sync::RwLock::new(HashSet::new()),
        }
    }

    /// Load from disk, dropping marks older than `today`.
    pub async fn load(&self, today: NaiveDate) -> Result<(), DomainError> {
        let mut marks: HashSet<Mark> = json_file::load_or_default(&self.path).await;
        marks.retain(|m| m.date >= today);
        *self.cache.write().await = marks;
        Ok(())
    }

    async fn save(&self) -> Result<(), DomainError> {
        let cache = self.cache.read().await;
        json_file::save_atomic(&self.path, &*cache).await
    }
}

#[async_trait::async_trait]
impl DedupTracker for DedupJson {
    async fn mark_if_unmarked(&self, key: &ChatKey, date: NaiveDate) -> Result<bool, DomainError> {
        {
            let mut cache = self.cache.write().await;
            if !cache.insert(Mark { key: *key, date }) {
                return Ok(false);
            }
        }
        // The in-memory mark already holds for today; a persist failure
        // downgrades to a warning rather than un-marking.
        if let Err(e) = self.save().await {
            warn!(key = %key, error = %e, "dedup mark persist failed");
        }
        Ok(true)
    }
}
