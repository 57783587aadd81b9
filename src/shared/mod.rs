//! Cross-cutting concerns: configuration and shared constants.

pub mod config;
