//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod schedule;

pub use entities::{BotEvent, ChatKey, Command, Reminder};
pub use errors::DomainError;
pub use schedule::Schedule;
