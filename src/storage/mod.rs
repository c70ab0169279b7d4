//! Grid storage interface and implementations
//!
//! A store holds named sheets, each a grid of cells. The scoreboard decides
//! which rows to write; a store only fetches whole sheets and overwrites the
//! row window it is handed.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileGridStore;
pub use memory::InMemoryGridStore;

use crate::marshal::{Cell, Grid, Row};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A window of whole rows on a named sheet, 1-based like a spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRange {
    pub sheet: String,
    pub start_row: usize,
    pub row_count: usize,
}

impl TargetRange {
    pub fn new(sheet: impl Into<String>, start_row: usize, row_count: usize) -> Self {
        Self {
            sheet: sheet.into(),
            start_row: start_row.max(1),
            row_count,
        }
    }

    /// Last row covered by the range (inclusive)
    pub fn end_row(&self) -> usize {
        (self.start_row + self.row_count).saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

impl fmt::Display for TargetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}:{}", self.sheet, self.start_row, self.end_row())
    }
}

/// Trait for grid storage operations
#[cfg_attr(test, mockall::automock)]
pub trait GridStore: Send + Sync {
    /// Fetch every row of a sheet
    fn fetch_grid(&self, sheet: &str) -> crate::error::Result<Grid>;

    /// Overwrite the rows covered by `range`; `rows.len()` must equal its row count
    fn store_grid(&self, range: &TargetRange, rows: &[Row]) -> crate::error::Result<()>;
}

/// Write `rows` into `grid` at the range's position, growing it as needed
pub(crate) fn apply_rows(grid: &mut Grid, range: &TargetRange, rows: &[Row]) {
    let start = range.start_row - 1;
    if grid.len() < start + rows.len() {
        grid.resize(start + rows.len(), Vec::new());
    }

    for (offset, row) in rows.iter().enumerate() {
        grid[start + offset] = row.clone();
    }
}

pub(crate) fn check_row_count(range: &TargetRange, rows: &[Row]) -> crate::error::Result<()> {
    if rows.len() != range.row_count {
        return Err(crate::error::ScoreboardError::StorageError {
            message: format!(
                "Range {} expects {} rows but {} were supplied",
                range,
                range.row_count,
                rows.len()
            ),
        }
        .into());
    }

    Ok(())
}

/// A row of `width` blank cells
pub fn blank_row(width: usize) -> Row {
    vec![Cell::blank(); width]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_range_display() {
        assert_eq!(TargetRange::new("Players", 1, 7).to_string(), "Players!1:7");
        assert_eq!(TargetRange::new("Games", 2, 200).to_string(), "Games!2:201");
    }

    #[test]
    fn test_target_range_is_one_based() {
        let range = TargetRange::new("Games", 0, 3);
        assert_eq!(range.start_row, 1);
        assert_eq!(range.end_row(), 3);
        assert!(TargetRange::new("Games", 1, 0).is_empty());
    }

    #[test]
    fn test_apply_rows_grows_grid() {
        let mut grid = vec![vec![Cell::from("Header")]];
        let range = TargetRange::new("Sheet", 2, 2);

        apply_rows(&mut grid, &range, &[vec![Cell::Int(1)], vec![Cell::Int(2)]]);

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec![Cell::from("Header")]);
        assert_eq!(grid[2], vec![Cell::Int(2)]);
    }

    #[test]
    fn test_apply_rows_overwrites_in_place() {
        let mut grid = vec![vec![Cell::Int(1)], vec![Cell::Int(2)], vec![Cell::Int(3)]];

        apply_rows(&mut grid, &TargetRange::new("Sheet", 2, 1), &[blank_row(1)]);

        assert_eq!(grid.len(), 3);
        assert!(grid[1].iter().all(Cell::is_blank));
        assert_eq!(grid[2], vec![Cell::Int(3)]);
    }

    #[test]
    fn test_check_row_count() {
        let range = TargetRange::new("Sheet", 1, 2);
        assert!(check_row_count(&range, &[blank_row(1), blank_row(1)]).is_ok());
        assert!(check_row_count(&range, &[blank_row(1)]).is_err());
    }
}
