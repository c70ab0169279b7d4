//! Chess Scoreboard - sheet-backed leaderboard with Elo rating replay
//!
//! This crate converts between spreadsheet-style rows and typed records,
//! replays a game history to derive ratings and ranks, and writes the
//! result back to a grid store.

pub mod config;
pub mod error;
pub mod marshal;
pub mod metrics;
pub mod rating;
pub mod scoreboard;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Result, ScoreboardError};
pub use types::*;

// Re-export key components
pub use rating::{EloRatingCalculator, RatingModel, ReplayEngine};
pub use scoreboard::Scoreboard;
pub use storage::{GridStore, InMemoryGridStore, JsonFileGridStore, TargetRange};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
