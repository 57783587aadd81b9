//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{ChatKey, DomainError, Reminder};
use chrono::NaiveDate;

/// Telegram gateway. Delivers bot messages into a chat.
#[async_trait::async_trait]
pub trait TgGateway: Send + Sync {
    /// Send `text` to the chat behind `key`, replying into its topic thread
    /// when the key carries one.
    async fn send_message(&self, key: &ChatKey, text: &str) -> Result<(), DomainError>;
}

/// Reminder repository. Insertion-ordered reminder list per chat key,
/// persisted write-through on every mutation.
#[async_trait::async_trait]
pub trait ReminderRepo: Send + Sync {
    /// All keys that have been addressed by a command (lists created lazily).
    async fn keys(&self) -> Result<Vec<ChatKey>, DomainError>;

    /// Reminders for the key in insertion order. Empty if the key is absent.
    async fn list(&self, key: &ChatKey) -> Result<Vec<Reminder>, DomainError>;

    /// Append a reminder. No duplicate detection: adding the same user and
    /// schedule twice yields two entries.
    async fn add(&self, key: &ChatKey, reminder: Reminder) -> Result<(), DomainError>;

    /// Replace the key's list with an empty one.
    async fn reset(&self, key: &ChatKey) -> Result<(), DomainError>;
}

/// Report ledger. Last calendar date a report was received, per chat key.
#[async_trait::async_trait]
pub trait ReportLedger: Send + Sync {
    /// Record that `key` reported on `date`. Overwrites any earlier date.
    async fn record_report(&self, key: &ChatKey, date: NaiveDate) -> Result<(), DomainError>;

    /// True iff the last recorded report for `key` is exactly `date`.
    async fn has_reported_on(&self, key: &ChatKey, date: NaiveDate) -> Result<bool, DomainError>;
}

/// Daily notification dedup. At most one mark per (key, date).
#[async_trait::async_trait]
pub trait DedupTracker: Send + Sync {
    /// Record the (key, date) mark and return true if it was absent; return
    /// false with no side effect when already marked.
    async fn mark_if_unmarked(&self, key: &ChatKey, date: NaiveDate) -> Result<bool, DomainError>;
}
