//! Full-history rating replay
//!
//! Ratings are derived state: every recompute starts from the calculator's
//! initial rating and replays the whole history in stored order. Each game
//! reads the ratings left behind by the games before it, so reordering the
//! history changes the result.

use crate::error::ScoreboardError;
use crate::rating::calculator::RatingCalculator;
use crate::rating::elo::{EloRatingCalculator, RatingModel};
use crate::rating::history::History;
use crate::rating::roster::Roster;
use crate::types::{GameId, RatingChange};
use tracing::{debug, info, warn};

/// Rating changes produced by one replayed game
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub game_id: GameId,
    pub was_stalemate: bool,
    pub winner: RatingChange,
    pub loser: RatingChange,
}

/// Outcome of a recompute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecomputeReport {
    pub games_replayed: usize,
    pub steps: Vec<ReplayStep>,
    /// Games excluded from the replay and why
    pub skipped: Vec<ScoreboardError>,
}

impl RecomputeReport {
    pub fn games_skipped(&self) -> usize {
        self.skipped.len()
    }
}

/// Replays a game history against a roster
pub struct ReplayEngine {
    calculator: Box<dyn RatingCalculator>,
}

impl ReplayEngine {
    pub fn new(calculator: Box<dyn RatingCalculator>) -> Self {
        Self { calculator }
    }

    /// Engine backed by the Elo calculator
    pub fn elo(model: RatingModel) -> crate::error::Result<Self> {
        Ok(Self::new(Box::new(EloRatingCalculator::new(model)?)))
    }

    pub fn calculator(&self) -> &dyn RatingCalculator {
        self.calculator.as_ref()
    }

    /// Reset every rating, replay the history in order and re-rank the roster
    pub fn recompute(
        &self,
        roster: &mut Roster,
        history: &History,
    ) -> Result<RecomputeReport, ScoreboardError> {
        let mut report = RecomputeReport::default();

        roster.reset_ratings(self.calculator.initial_rating());

        for scored in history.iter() {
            if let Some(problem) = scored.problem() {
                warn!("Skipping game #{} during replay: {}", scored.id, problem);
                report.skipped.push(problem);
                continue;
            }

            let Some((winner_id, loser_id)) = scored.participants() else {
                continue;
            };
            let (Some(winner_rating), Some(loser_rating)) =
                (roster.rating(winner_id), roster.rating(loser_id))
            else {
                continue;
            };

            let (new_winner, new_loser) =
                self.calculator
                    .rate_game(scored.game.outcome(), winner_rating, loser_rating);

            roster.set_rating(winner_id, new_winner);
            roster.set_rating(loser_id, new_loser);

            debug!(
                "Game #{}: {} {:.2} -> {:.2}, {} {:.2} -> {:.2}",
                scored.id,
                scored.game.winner_name,
                winner_rating,
                new_winner,
                scored.game.loser_name,
                loser_rating,
                new_loser
            );

            report.steps.push(ReplayStep {
                game_id: scored.id,
                was_stalemate: scored.game.was_stalemate,
                winner: RatingChange {
                    player_id: winner_id,
                    old_rating: winner_rating,
                    new_rating: new_winner,
                },
                loser: RatingChange {
                    player_id: loser_id,
                    old_rating: loser_rating,
                    new_rating: new_loser,
                },
            });
            report.games_replayed += 1;
        }

        roster.assign_ranks()?;

        info!(
            "Replayed {} games for {} players ({} skipped)",
            report.games_replayed,
            roster.len(),
            report.games_skipped()
        );

        Ok(report)
    }
}

impl Default for ReplayEngine {
    fn default() -> Self {
        Self::new(Box::new(EloRatingCalculator::default()))
    }
}

impl std::fmt::Debug for ReplayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayEngine")
            .field("calculator", &self.calculator.config())
            .finish()
    }
}
