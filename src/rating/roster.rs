//! Player roster keyed by stable identity
//!
//! Players keep their slot for the lifetime of the roster, so a [`PlayerId`]
//! taken before a replay still refers to the same player afterwards. The
//! leaderboard order lives in each player's `rank`, not in slot order.

use crate::error::ScoreboardError;
use crate::types::{Player, PlayerId};
use crate::utils::{compare_names, names_equal};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from decoded players, rejecting names without a first name
    pub fn from_players(players: Vec<Player>) -> Result<Self, ScoreboardError> {
        for player in &players {
            player.first_name()?;
        }

        Ok(Self { players })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.0)
    }

    /// Iterate players in slot order
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players
            .iter()
            .enumerate()
            .map(|(index, player)| (PlayerId(index), player))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Case-insensitive exact lookup; the first matching slot wins
    pub fn find_by_name(&self, name: &str) -> Option<PlayerId> {
        let name = name.trim();
        self.players
            .iter()
            .position(|player| names_equal(&player.name, name))
            .map(PlayerId)
    }

    /// Add a player and return its identity
    pub fn push(&mut self, player: Player) -> Result<PlayerId, ScoreboardError> {
        player.first_name()?;

        if self.find_by_name(&player.name).is_some() {
            return Err(ScoreboardError::DuplicatePlayer { name: player.name });
        }

        self.players.push(player);
        Ok(PlayerId(self.players.len() - 1))
    }

    /// Rank a newly added player would take before the next recompute
    pub fn next_rank(&self) -> u32 {
        self.players
            .iter()
            .map(|player| player.rank)
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn rating(&self, id: PlayerId) -> Option<f64> {
        self.get(id).map(|player| player.rating)
    }

    pub fn set_rating(&mut self, id: PlayerId, rating: f64) {
        if let Some(player) = self.players.get_mut(id.0) {
            player.rating = rating;
        }
    }

    pub fn reset_ratings(&mut self, rating: f64) {
        for player in &mut self.players {
            player.rating = rating;
        }
    }

    /// Sort by rating (descending), then first name (case-insensitive), and
    /// store each player's 1-based position as its rank
    pub fn assign_ranks(&mut self) -> Result<(), ScoreboardError> {
        let first_names = self
            .players
            .iter()
            .map(Player::first_name)
            .collect::<Result<Vec<_>, _>>()?;

        let mut order: Vec<usize> = (0..self.players.len()).collect();
        order.sort_by(|&a, &b| {
            self.players[b]
                .rating
                .total_cmp(&self.players[a].rating)
                .then_with(|| compare_names(first_names[a], first_names[b]))
                .then_with(|| a.cmp(&b))
        });

        for (position, index) in order.into_iter().enumerate() {
            self.players[index].rank = position as u32 + 1;
        }

        Ok(())
    }

    /// Players ordered by rank
    pub fn standings(&self) -> Vec<(PlayerId, &Player)> {
        let mut standings: Vec<_> = self.iter().collect();
        standings.sort_by_key(|(id, player)| (player.rank, *id));
        standings
    }
}
