//! Shared JSON file helpers for the write-through stores.
//!
//! Load-or-default on read; atomic write-replace on save so a crash
//! mid-write cannot corrupt a store.

use crate::domain::DomainError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Read and parse the file. A missing or unparseable file yields the default
/// value: silent recovery, not an error.
pub async fn load_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match fs::read_to_string(path).await {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => T::default(),
    }
}

/// Serialize and atomically replace the file.
/// 1. Write to a temp file next to the target
/// 2. sync_all() to ensure flush to disk
/// 3. Atomic rename to target path
pub async fn save_atomic<T>(path: &Path, data: &T) -> Result<(), DomainError>
where
    T: Serialize,
{
    let json =
        serde_json::to_string_pretty(data).map_err(|e| DomainError::Storage(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::Storage(format!("create data dir: {}", e)))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut f = fs::File::create(&temp_path)
        .await
        .map_err(|e| DomainError::Storage(format!("create temp file: {}", e)))?;
    f.write_all(json.as_bytes())
        .await
        .map_err(|e| DomainError::Storage(format!("write temp file: {}", e)))?;
    f.sync_all()
        .await
        .map_err(|e| DomainError::Storage(format!("sync temp file: {}", e)))?;
    drop(f); // Close file handle before rename

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| DomainError::Storage(format!("atomic rename failed: {}", e)))?;

    Ok(())
}
