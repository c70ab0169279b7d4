//! Ordered game history with resolved player identities

use crate::error::ScoreboardError;
use crate::rating::roster::Roster;
use crate::types::{Game, GameId, PlayerId};

/// A game plus the roster identities its names resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredGame {
    pub id: GameId,
    pub game: Game,
    pub winner: Option<PlayerId>,
    pub loser: Option<PlayerId>,
}

impl ScoredGame {
    fn resolve(id: GameId, mut game: Game, roster: &Roster) -> Self {
        game.id = Some(id);
        Self {
            id,
            winner: roster.find_by_name(&game.winner_name),
            loser: roster.find_by_name(&game.loser_name),
            game,
        }
    }

    /// Both identities, if both names resolved
    pub fn participants(&self) -> Option<(PlayerId, PlayerId)> {
        self.winner.zip(self.loser)
    }

    /// Why this game cannot be replayed, if it cannot
    pub fn problem(&self) -> Option<ScoreboardError> {
        if self.winner.is_none() {
            return Some(ScoreboardError::UnresolvedIdentity {
                game_id: self.id,
                name: self.game.winner_name.clone(),
            });
        }
        if self.loser.is_none() {
            return Some(ScoreboardError::UnresolvedIdentity {
                game_id: self.id,
                name: self.game.loser_name.clone(),
            });
        }
        if self.winner == self.loser {
            return Some(ScoreboardError::InvalidGame {
                reason: format!(
                    "game #{} has '{}' playing themselves",
                    self.id, self.game.winner_name
                ),
            });
        }
        None
    }
}

/// Games in the order they were played
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    games: Vec<ScoredGame>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve decoded games against a roster. Game ids follow row order
    /// (1-based); unresolved names are kept as absent identities.
    pub fn resolve(games: Vec<Game>, roster: &Roster) -> Self {
        let games = games
            .into_iter()
            .enumerate()
            .map(|(index, game)| ScoredGame::resolve(index as GameId + 1, game, roster))
            .collect();

        Self { games }
    }

    /// Re-run name resolution, e.g. after players were added
    pub fn relink(&mut self, roster: &Roster) {
        for scored in &mut self.games {
            scored.winner = roster.find_by_name(&scored.game.winner_name);
            scored.loser = roster.find_by_name(&scored.game.loser_name);
        }
    }

    /// Append a game, rejecting any game that could not be replayed
    pub fn push(&mut self, game: Game, roster: &Roster) -> Result<GameId, ScoreboardError> {
        let id = self.games.len() as GameId + 1;
        let scored = ScoredGame::resolve(id, game, roster);

        if let Some(problem) = scored.problem() {
            return Err(problem);
        }

        self.games.push(scored);
        Ok(id)
    }

    pub fn clear(&mut self) {
        self.games.clear();
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredGame> {
        self.games.iter()
    }

    /// The wire records, in play order
    pub fn records(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().map(|scored| &scored.game)
    }

    /// Data-quality problems for games that will be skipped on replay
    pub fn problems(&self) -> Vec<ScoreboardError> {
        self.games.iter().filter_map(ScoredGame::problem).collect()
    }
}
