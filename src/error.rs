//! Error types for the scoreboard
//!
//! Plumbing code returns the anyhow-backed [`Result`] alias; domain failures are
//! [`ScoreboardError`] variants so callers can `downcast_ref` them.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific scoreboard scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreboardError {
    #[error("The row size of {row_len} does not match the number of column names provided ({column_count})")]
    ShapeMismatch { row_len: usize, column_count: usize },

    #[error("Cannot convert {found} cell into {expected} for field '{field}'")]
    InvalidScalarCoercion {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Game #{game_id} references unknown player '{name}'")]
    UnresolvedIdentity { game_id: u32, name: String },

    #[error("Player name '{name}' must contain a first and last name separated by a space")]
    InvalidPlayerName { name: String },

    #[error("Player already exists: {name}")]
    DuplicatePlayer { name: String },

    #[error("Player not found: {name}")]
    PlayerNotFound { name: String },

    #[error("Invalid game: {reason}")]
    InvalidGame { reason: String },

    #[error("Sheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}
