//! Implements ReminderRepo using a JSON file.
//!
//! Whole document (chat key -> reminder list) is rewritten on every
//! mutation. Lists are created lazily on first add/reset.

use crate::adapters::persistence::json_file;
use crate::domain::{ChatKey, DomainError, Reminder};
use crate::ports::ReminderRepo;
use std::collections::HashMap;
use std::path::Path;

type ReminderMap = HashMap<ChatKey, Vec<Reminder>>;

/// JSON file-backed reminder lists.
pub struct RemindersJson {
    path: std::path::PathBuf,
    cache: tokio::sync::RwLock<ReminderMap>,
}

impl RemindersJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: tokio::sync::RwLock::new(ReminderMap::default()),
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
impl ReminderRepo for RemindersJson {
    async fn keys(&self) -> Result<Vec<ChatKey>, DomainError> {
        let cache = self.cache.read().await;
        let mut keys: Vec<ChatKey> = cache.keys().copied().collect();
        // Deterministic sweep order
        keys.sort();
        Ok(keys)
    }

    async fn list(&self, key: &ChatKey) -> Result<Vec<Reminder>, DomainError> {
        Ok(self.cache.read().await.get(key).cloned().unwrap_or_default())
    }

    async fn add(&self, key: &ChatKey, reminder: Reminder) -> Result<(), DomainError> {
        {
            let mut cache = self.cache.write().await;
            cache.entry(*key).or_default().push(reminder);
        }
        self.save().await
    }

    async fn reset(&self, key: &ChatKey) -> Result<(), DomainError> {
        {
            let mut cache = self.cache.write().await;
            cache.insert(*key, Vec::new());
        }
        self.save().await
    }
}
