//! Test fixtures and store implementations for integration testing

use chess_scoreboard::error::Result;
use chess_scoreboard::marshal::{Cell, Grid, Row};
use chess_scoreboard::storage::{GridStore, InMemoryGridStore, TargetRange};
use std::sync::{Arc, Mutex};

/// Grid store that records every write before passing it to an in-memory store
#[derive(Debug, Default)]
pub struct RecordingGridStore {
    inner: InMemoryGridStore,
    writes: Arc<Mutex<Vec<(TargetRange, Vec<Row>)>>>,
}

impl RecordingGridStore {
    pub fn new(inner: InMemoryGridStore) -> Self {
        Self {
            inner,
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All writes so far, oldest first
    pub fn writes(&self) -> Vec<(TargetRange, Vec<Row>)> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    /// Ranges written so far, rendered as `Sheet!start:end`
    pub fn written_ranges(&self) -> Vec<String> {
        self.writes()
            .iter()
            .map(|(range, _)| range.to_string())
            .collect()
    }
}

impl GridStore for RecordingGridStore {
    fn fetch_grid(&self, sheet: &str) -> Result<Grid> {
        self.inner.fetch_grid(sheet)
    }

    fn store_grid(&self, range: &TargetRange, rows: &[Row]) -> Result<()> {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((range.clone(), rows.to_vec()));
        }
        self.inner.store_grid(range, rows)
    }
}

/// Players sheet the way a spreadsheet API returns it: every cell formatted as text
pub fn club_players_grid() -> Grid {
    text_grid(&[
        &["Rank", "Name", "Wins", "Losses", "Stalemates", "Rating"],
        &["1", "Dade Cook", "0", "0", "0", "400"],
        &["2", "Carla Cook", "0", "0", "0", "400"],
        &["3", "Lane Cook", "0", "0", "0", "400"],
        &["4", "Mary Ann Cook", "0", "0", "0", "400"],
        &["", "", "", "", "", ""],
        &["", "", "", "", "", ""],
    ])
}

/// Games sheet with the row-number column and trailing blank rows
pub fn club_games_grid() -> Grid {
    text_grid(&[
        &["#", "Winner", "Loser", "Stalemate?"],
        &["1", "Dade Cook", "Carla Cook", "FALSE"],
        &["2", "carla cook", "Lane Cook", "FALSE"],
        &["3", "Mary Ann Cook", "Dade Cook", "TRUE"],
        &["4", "Dade Cook", "Lane Cook", "FALSE"],
        &["5", "", "", ""],
        &["6", "", "", ""],
    ])
}

pub fn club_store() -> RecordingGridStore {
    RecordingGridStore::new(InMemoryGridStore::with_sheets([
        ("Players", club_players_grid()),
        ("Games", club_games_grid()),
    ]))
}

pub fn text_grid(rows: &[&[&str]]) -> Grid {
    rows.iter()
        .map(|row| row.iter().map(|cell| Cell::from(*cell)).collect())
        .collect()
}
