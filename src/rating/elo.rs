//! Elo rating system implementation
//!
//! Ratings are transformed with `10^(rating / base_rating)`, so `base_rating`
//! is both the starting rating and the spread of the expected-score curve.
//! New ratings are rounded to two decimals with round-half-to-even.

use crate::error::ScoreboardError;
use crate::rating::calculator::RatingCalculator;
use serde::{Deserialize, Serialize};
use skillratings::Outcomes;

/// Constants of the Elo model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingModel {
    /// How much a single game can move a rating
    pub k_factor: f64,
    /// Starting rating for every player and divisor of the rating transform
    pub base_rating: f64,
}

impl Default for RatingModel {
    fn default() -> Self {
        Self {
            k_factor: 100.0,
            base_rating: 400.0,
        }
    }
}

impl RatingModel {
    pub fn new(k_factor: f64, base_rating: f64) -> Self {
        Self {
            k_factor,
            base_rating,
        }
    }

    /// Validate model parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.k_factor.is_finite() && self.k_factor > 0.0) {
            return Err(ScoreboardError::ConfigurationError {
                message: "K-factor must be positive".to_string(),
            }
            .into());
        }

        if !(self.base_rating.is_finite() && self.base_rating > 0.0) {
            return Err(ScoreboardError::ConfigurationError {
                message: "Base rating must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Round a rating to two decimal places, ties to even
pub fn round_rating(rating: f64) -> f64 {
    (rating * 100.0).round_ties_even() / 100.0
}

/// Elo rating calculator implementation
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    model: RatingModel,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(model: RatingModel) -> crate::error::Result<Self> {
        model.validate()?;

        Ok(Self { model })
    }

    pub fn model(&self) -> RatingModel {
        self.model
    }

    fn transformed_rating(&self, rating: f64) -> f64 {
        10f64.powf(rating / self.model.base_rating)
    }

    /// Expected scores of the winner and loser
    pub fn expected_scores(&self, winner_rating: f64, loser_rating: f64) -> (f64, f64) {
        let winner = self.transformed_rating(winner_rating);
        let loser = self.transformed_rating(loser_rating);

        (winner / (winner + loser), loser / (winner + loser))
    }

    /// New ratings before rounding
    pub fn unrounded_ratings(
        &self,
        outcome: Outcomes,
        winner_rating: f64,
        loser_rating: f64,
    ) -> (f64, f64) {
        let (winner_expected, loser_expected) = self.expected_scores(winner_rating, loser_rating);

        let winner_actual = outcome.to_chess_points();
        let loser_actual = 1.0 - winner_actual;

        (
            winner_rating + self.model.k_factor * (winner_actual - winner_expected),
            loser_rating + self.model.k_factor * (loser_actual - loser_expected),
        )
    }
}

impl Default for EloRatingCalculator {
    fn default() -> Self {
        Self {
            model: RatingModel::default(),
        }
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn rate_game(&self, outcome: Outcomes, winner_rating: f64, loser_rating: f64) -> (f64, f64) {
        let (winner, loser) = self.unrounded_ratings(outcome, winner_rating, loser_rating);
        (round_rating(winner), round_rating(loser))
    }

    fn initial_rating(&self) -> f64 {
        self.model.base_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "elo",
            "k_factor": self.model.k_factor,
            "base_rating": self.model.base_rating
        })
    }
}
