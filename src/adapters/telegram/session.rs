//! Persistent grammers session storage.
//!
//! The bot's MTProto authorization lives in an SQLite session file, so a
//! restart does not need to repeat the BotFather-token sign-in.

use crate::domain::DomainError;
use grammers_session::storages::SqliteSession;
use std::path::Path;

/// Opens (or creates) the session store at `path`, creating parent
/// directories as needed.
pub async fn open_session(path: impl AsRef<Path>) -> Result<SqliteSession, DomainError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::TgGateway(format!("create session directory: {}", e)))?;
    }
    SqliteSession::open(path)
        .await
        .map_err(|e| DomainError::TgGateway(format!("open session file: {}", e)))
}
