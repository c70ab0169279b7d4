//! Common types used throughout the scoreboard

use crate::error::ScoreboardError;
use crate::marshal::{decode_cell, Cell, CellValue, FieldDescriptor, Record, RecordShape};
use serde::{Deserialize, Serialize};
use skillratings::Outcomes;
use std::fmt;

/// Stable identity of a player within a loaded roster (its slot index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Game number, derived from the game's row position (1-based)
pub type GameId = u32;

/// A row of the Players sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Rank on the leaderboard; also the row identity when loaded
    pub rank: u32,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub stalemates: u32,
    pub rating: f64,
}

const PLAYER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("rank").wire("Rank").required(),
    FieldDescriptor::new("name").wire("Name").required(),
    FieldDescriptor::new("wins").wire("Wins"),
    FieldDescriptor::new("losses").wire("Losses"),
    FieldDescriptor::new("stalemates").wire("Stalemates"),
    FieldDescriptor::new("rating").wire("Rating"),
];

impl Player {
    pub fn new(rank: u32, name: impl Into<String>, rating: f64) -> Self {
        Self {
            rank,
            name: name.into(),
            rating,
            ..Self::default()
        }
    }

    /// Everything before the first space of the name
    pub fn first_name(&self) -> Result<&str, ScoreboardError> {
        self.name
            .split_once(' ')
            .map(|(first, _)| first)
            .ok_or_else(|| ScoreboardError::InvalidPlayerName {
                name: self.name.clone(),
            })
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.stalemates
    }
}

impl Record for Player {
    const SHAPE: RecordShape = RecordShape::Composite(PLAYER_FIELDS);

    fn set_field(&mut self, index: usize, cell: &Cell) -> Result<(), ScoreboardError> {
        let field = &PLAYER_FIELDS[index];
        match index {
            0 => self.rank = decode_cell(field, cell)?,
            1 => self.name = decode_cell::<String>(field, cell)?.trim().to_string(),
            2 => self.wins = decode_cell(field, cell)?,
            3 => self.losses = decode_cell(field, cell)?,
            4 => self.stalemates = decode_cell(field, cell)?,
            5 => self.rating = decode_cell(field, cell)?,
            _ => {}
        }
        Ok(())
    }

    fn field(&self, index: usize) -> Cell {
        match index {
            0 => self.rank.to_cell(),
            1 => self.name.to_cell(),
            2 => self.wins.to_cell(),
            3 => self.losses.to_cell(),
            4 => self.stalemates.to_cell(),
            5 => self.rating.to_cell(),
            _ => Cell::blank(),
        }
    }
}

/// A row of the Games sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Row-derived game number; never written back
    pub id: Option<GameId>,
    pub winner_name: String,
    pub loser_name: String,
    /// For a stalemate "winner" and "loser" are just the two players
    pub was_stalemate: bool,
}

const GAME_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id").wire("#").transient(),
    FieldDescriptor::new("winner_name").wire("Winner").required(),
    FieldDescriptor::new("loser_name").wire("Loser").required(),
    FieldDescriptor::new("was_stalemate").wire("Stalemate?"),
];

impl Game {
    pub fn new(
        winner_name: impl Into<String>,
        loser_name: impl Into<String>,
        was_stalemate: bool,
    ) -> Self {
        Self {
            id: None,
            winner_name: winner_name.into(),
            loser_name: loser_name.into(),
            was_stalemate,
        }
    }

    /// Outcome from the winner's point of view
    pub fn outcome(&self) -> Outcomes {
        if self.was_stalemate {
            Outcomes::DRAW
        } else {
            Outcomes::WIN
        }
    }
}

impl Record for Game {
    const SHAPE: RecordShape = RecordShape::Composite(GAME_FIELDS);

    fn set_field(&mut self, index: usize, cell: &Cell) -> Result<(), ScoreboardError> {
        let field = &GAME_FIELDS[index];
        match index {
            0 => self.id = decode_cell(field, cell)?,
            1 => self.winner_name = decode_cell::<String>(field, cell)?.trim().to_string(),
            2 => self.loser_name = decode_cell::<String>(field, cell)?.trim().to_string(),
            3 => self.was_stalemate = decode_cell(field, cell)?,
            _ => {}
        }
        Ok(())
    }

    fn field(&self, index: usize) -> Cell {
        match index {
            0 => self.id.to_cell(),
            1 => self.winner_name.to_cell(),
            2 => self.loser_name.to_cell(),
            3 => self.was_stalemate.to_cell(),
            _ => Cell::blank(),
        }
    }
}

/// Rating change for one player in one replayed game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub old_rating: f64,
    pub new_rating: f64,
}

impl RatingChange {
    pub fn delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::{decode_all, header_row, to_row, to_rows};

    #[test]
    fn test_first_name() {
        let player = Player::new(1, "Dade Cook", 400.0);
        assert_eq!(player.first_name().unwrap(), "Dade");

        let player = Player::new(2, "Mary Ann Cook", 400.0);
        assert_eq!(player.first_name().unwrap(), "Mary");

        let player = Player::new(3, "Cher", 400.0);
        assert!(matches!(
            player.first_name(),
            Err(ScoreboardError::InvalidPlayerName { .. })
        ));
    }

    #[test]
    fn test_player_wire_shape() {
        assert_eq!(
            header_row::<Player>().unwrap(),
            vec![
                Cell::from("Rank"),
                Cell::from("Name"),
                Cell::from("Wins"),
                Cell::from("Losses"),
                Cell::from("Stalemates"),
                Cell::from("Rating"),
            ]
        );

        let mut player = Player::new(2, "Carla Cook", 412.5);
        player.wins = 3;
        assert_eq!(
            to_row(&player),
            vec![
                Cell::Int(2),
                Cell::from("Carla Cook"),
                Cell::Int(3),
                Cell::Int(0),
                Cell::Int(0),
                Cell::Float(412.5),
            ]
        );
    }

    #[test]
    fn test_game_id_is_never_written() {
        let mut game = Game::new("Dade Cook", "Lane Cook", true);
        game.id = Some(7);

        assert_eq!(
            header_row::<Game>().unwrap(),
            vec![Cell::from("Winner"), Cell::from("Loser"), Cell::from("Stalemate?")]
        );
        assert_eq!(
            to_row(&game),
            vec![Cell::from("Dade Cook"), Cell::from("Lane Cook"), Cell::Bool(true)]
        );
    }

    #[test]
    fn test_decode_players_sheet_with_string_cells() {
        // Sheet APIs commonly return formatted strings rather than typed values
        let grid = vec![
            vec![
                Cell::from("Rank"),
                Cell::from("Name"),
                Cell::from("Wins"),
                Cell::from("Losses"),
                Cell::from("Stalemates"),
                Cell::from("Rating"),
            ],
            vec![
                Cell::from("1"),
                Cell::from(" Dade Cook "),
                Cell::from("4"),
                Cell::from("1"),
                Cell::from("0"),
                Cell::from("450.25"),
            ],
            vec![
                Cell::from(""),
                Cell::from(""),
                Cell::from(""),
                Cell::from(""),
                Cell::from(""),
                Cell::from(""),
            ],
        ];

        let players: Vec<Player> = decode_all(&grid, None).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Dade Cook");
        assert_eq!(players[0].rank, 1);
        assert_eq!(players[0].wins, 4);
        assert_eq!(players[0].rating, 450.25);
    }

    #[test]
    fn test_games_roundtrip() {
        let games = vec![
            Game::new("Dade Cook", "Lane Cook", false),
            Game::new("Carla Cook", "Dade Cook", true),
        ];

        let grid: Vec<_> = to_rows(&games, true).collect();
        let decoded: Vec<Game> = decode_all(&grid, None).unwrap();
        assert_eq!(decoded, games);
    }

    #[test]
    fn test_game_outcome() {
        assert_eq!(Game::new("A B", "C D", false).outcome(), Outcomes::WIN);
        assert_eq!(Game::new("A B", "C D", true).outcome(), Outcomes::DRAW);
    }

    #[test]
    fn test_rating_change_delta() {
        let change = RatingChange {
            player_id: PlayerId(0),
            old_rating: 400.0,
            new_rating: 450.0,
        };
        assert_eq!(change.delta(), 50.0);
    }
}
