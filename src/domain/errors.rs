//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("Telegram gateway error: {0}")]
    TgGateway(String),

    #[error("storage error: {0}")]
    Storage(String),
}
