//! Configuration management for the scoreboard
//!
//! Loading from TOML files and environment variables, validation, and
//! default values.

pub mod app;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, StorageSettings};
