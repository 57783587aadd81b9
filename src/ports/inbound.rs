//! Inbound port. The transport adapter calls into the application.

use crate::domain::DomainError;

/// Input port: the update stream feeding events into the application.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Consume transport updates until the stream ends or the process stops.
    async fn run(&self) -> Result<(), DomainError>;
}
