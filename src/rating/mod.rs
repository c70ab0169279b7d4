//! Rating engine: Elo calculation and full-history replay
//!
//! The roster holds players by stable identity, the history holds games in
//! play order, and the replay engine derives every rating from the two.

pub mod calculator;
pub mod elo;
pub mod history;
pub mod replay;
pub mod roster;

// Re-export commonly used types
pub use calculator::RatingCalculator;
pub use elo::{round_rating, EloRatingCalculator, RatingModel};
pub use history::{History, ScoredGame};
pub use replay::{RecomputeReport, ReplayEngine, ReplayStep};
pub use roster::Roster;
