//! Grid store backed by a single JSON document on disk
//!
//! The whole document is rewritten on every store. Cells are stored as plain
//! JSON scalars, so the file stays readable and hand-editable.

use crate::error::ScoreboardError;
use crate::marshal::{Grid, Row};
use crate::storage::{apply_rows, check_row_count, GridStore, TargetRange};
use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// On-disk layout of the grid file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridDocument {
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sheets: BTreeMap<String, Grid>,
}

/// JSON file grid store implementation
#[derive(Debug)]
pub struct JsonFileGridStore {
    path: PathBuf,
    document: RwLock<GridDocument>,
}

impl JsonFileGridStore {
    /// Open a grid file, starting from an empty document if it does not exist
    pub fn open(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let document = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|e| ScoreboardError::StorageError {
                message: format!("Failed to read {}: {}", path.display(), e),
            })?;
            serde_json::from_str(&text).map_err(|e| ScoreboardError::StorageError {
                message: format!("Failed to parse {}: {}", path.display(), e),
            })?
        } else {
            info!("Grid file {} not found, starting empty", path.display());
            GridDocument::default()
        };

        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the document was last written
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.document.read().ok().and_then(|document| document.updated_at)
    }

    fn persist(&self, document: &GridDocument) -> crate::error::Result<()> {
        let text =
            serde_json::to_string_pretty(document).map_err(|e| ScoreboardError::StorageError {
                message: format!("Failed to serialize grids: {}", e),
            })?;

        fs::write(&self.path, text).map_err(|e| ScoreboardError::StorageError {
            message: format!("Failed to write {}: {}", self.path.display(), e),
        })?;

        Ok(())
    }
}

impl GridStore for JsonFileGridStore {
    fn fetch_grid(&self, sheet: &str) -> crate::error::Result<Grid> {
        let document = self
            .document
            .read()
            .map_err(|_| ScoreboardError::StorageError {
                message: "Failed to acquire document read lock".to_string(),
            })?;

        document.sheets.get(sheet).cloned().ok_or_else(|| {
            ScoreboardError::SheetNotFound {
                sheet: sheet.to_string(),
            }
            .into()
        })
    }

    fn store_grid(&self, range: &TargetRange, rows: &[Row]) -> crate::error::Result<()> {
        check_row_count(range, rows)?;

        let mut document = self
            .document
            .write()
            .map_err(|_| ScoreboardError::StorageError {
                message: "Failed to acquire document write lock".to_string(),
            })?;

        // The in-memory document only changes once the file write succeeded
        let mut updated = document.clone();
        let grid = updated.sheets.entry(range.sheet.clone()).or_default();
        apply_rows(grid, range, rows);
        updated.updated_at = Some(current_timestamp());

        self.persist(&updated)?;
        *document = updated;

        debug!("Wrote {} rows into {} ({})", rows.len(), range, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::Cell;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileGridStore::open(dir.path().join("scoreboard.json")).unwrap();

        assert!(store.fetch_grid("Players").is_err());
        assert!(store.updated_at().is_none());
    }

    #[test]
    fn test_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scoreboard.json");

        let store = JsonFileGridStore::open(&path).unwrap();
        store
            .store_grid(
                &TargetRange::new("Players", 1, 2),
                &[
                    vec![Cell::from("Rank"), Cell::from("Name"), Cell::from("Rating")],
                    vec![Cell::Int(1), Cell::from("Dade Cook"), Cell::Float(450.5)],
                ],
            )
            .unwrap();
        assert!(store.updated_at().is_some());

        let reopened = JsonFileGridStore::open(&path).unwrap();
        let grid = reopened.fetch_grid("Players").unwrap();
        assert_eq!(grid[1], vec![Cell::Int(1), Cell::from("Dade Cook"), Cell::Float(450.5)]);
    }

    #[test]
    fn test_failed_write_leaves_document_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_dir").join("scoreboard.json");
        let store = JsonFileGridStore::open(&path).unwrap();

        let err = store
            .store_grid(&TargetRange::new("Games", 1, 1), &[vec![Cell::from("Winner")]])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScoreboardError>(),
            Some(ScoreboardError::StorageError { .. })
        ));

        let err = store.fetch_grid("Games").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScoreboardError>(),
            Some(ScoreboardError::SheetNotFound { .. })
        ));
        assert!(store.updated_at().is_none());
    }

    #[test]
    fn test_reads_hand_written_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scoreboard.json");
        fs::write(
            &path,
            r#"{
                "sheets": {
                    "Games": [
                        ["Winner", "Loser", "Stalemate?"],
                        ["Dade Cook", "Lane Cook", false]
                    ]
                }
            }"#,
        )
        .unwrap();

        let store = JsonFileGridStore::open(&path).unwrap();
        let grid = store.fetch_grid("Games").unwrap();
        assert_eq!(grid[1][2], Cell::Bool(false));
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scoreboard.json");
        fs::write(&path, "not json").unwrap();

        let err = JsonFileGridStore::open(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScoreboardError>(),
            Some(ScoreboardError::StorageError { .. })
        ));
    }
}
