//! Rating calculator trait
//!
//! This module defines the interface the replay engine uses to rate a single
//! two-player game.

use skillratings::Outcomes;

/// Trait for calculating rating changes after a single game
#[cfg_attr(test, mockall::automock)]
pub trait RatingCalculator: Send + Sync {
    /// Calculate new ratings for the two players of a game
    ///
    /// # Arguments
    /// * `outcome` - Result from the winner's point of view (`WIN` or `DRAW`)
    /// * `winner_rating` - Current rating of the winner (player one for a draw)
    /// * `loser_rating` - Current rating of the loser (player two for a draw)
    ///
    /// # Returns
    /// The winner's and loser's new ratings
    fn rate_game(&self, outcome: Outcomes, winner_rating: f64, loser_rating: f64) -> (f64, f64);

    /// The rating every player starts from before a replay
    fn initial_rating(&self) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;
}
