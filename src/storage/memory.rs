//! In-memory grid store

use crate::error::ScoreboardError;
use crate::marshal::{Grid, Row};
use crate::storage::{apply_rows, check_row_count, GridStore, TargetRange};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory grid store implementation
#[derive(Debug, Default)]
pub struct InMemoryGridStore {
    sheets: RwLock<HashMap<String, Grid>>,
}

impl InMemoryGridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with sheets
    pub fn with_sheets<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = (S, Grid)>,
        S: Into<String>,
    {
        let sheets = sheets
            .into_iter()
            .map(|(name, grid)| (name.into(), grid))
            .collect();

        Self {
            sheets: RwLock::new(sheets),
        }
    }

    /// Replace a whole sheet
    pub fn insert_sheet(&self, sheet: impl Into<String>, grid: Grid) -> crate::error::Result<()> {
        let mut sheets = self
            .sheets
            .write()
            .map_err(|_| ScoreboardError::StorageError {
                message: "Failed to acquire sheets write lock".to_string(),
            })?;

        sheets.insert(sheet.into(), grid);
        Ok(())
    }
}

impl GridStore for InMemoryGridStore {
    fn fetch_grid(&self, sheet: &str) -> crate::error::Result<Grid> {
        let sheets = self
            .sheets
            .read()
            .map_err(|_| ScoreboardError::StorageError {
                message: "Failed to acquire sheets read lock".to_string(),
            })?;

        sheets.get(sheet).cloned().ok_or_else(|| {
            ScoreboardError::SheetNotFound {
                sheet: sheet.to_string(),
            }
            .into()
        })
    }

    fn store_grid(&self, range: &TargetRange, rows: &[Row]) -> crate::error::Result<()> {
        check_row_count(range, rows)?;

        let mut sheets = self
            .sheets
            .write()
            .map_err(|_| ScoreboardError::StorageError {
                message: "Failed to acquire sheets write lock".to_string(),
            })?;

        let grid = sheets.entry(range.sheet.clone()).or_default();
        apply_rows(grid, range, rows);

        debug!("Stored {} rows into {}", rows.len(), range);
        Ok(())
    }
}
