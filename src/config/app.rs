//! Main application configuration
//!
//! Configuration comes from a TOML file or from `SCOREBOARD_*` environment
//! variables layered over the defaults, and is validated before use.

use crate::rating::RatingModel;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingModel,
    pub storage: StorageSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where the scoreboard grids live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON grid file
    pub path: PathBuf,
    /// Sheet holding the roster
    pub players_sheet: String,
    /// Sheet holding the game history
    pub games_sheet: String,
    /// Last sheet row a flush may blank when a collection shrinks
    pub last_row: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "chess-scoreboard".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("scoreboard.json"),
            players_sheet: "Players".to_string(),
            games_sheet: "Games".to_string(),
            last_row: 201,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;

        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SCOREBOARD_SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("SCOREBOARD_LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(k_factor) = env::var("SCOREBOARD_K_FACTOR") {
            self.rating.k_factor = k_factor
                .parse()
                .map_err(|_| anyhow!("Invalid SCOREBOARD_K_FACTOR value: {}", k_factor))?;
        }
        if let Ok(base_rating) = env::var("SCOREBOARD_BASE_RATING") {
            self.rating.base_rating = base_rating
                .parse()
                .map_err(|_| anyhow!("Invalid SCOREBOARD_BASE_RATING value: {}", base_rating))?;
        }

        // Storage settings
        if let Ok(path) = env::var("SCOREBOARD_DATA_PATH") {
            self.storage.path = PathBuf::from(path);
        }
        if let Ok(sheet) = env::var("SCOREBOARD_PLAYERS_SHEET") {
            self.storage.players_sheet = sheet;
        }
        if let Ok(sheet) = env::var("SCOREBOARD_GAMES_SHEET") {
            self.storage.games_sheet = sheet;
        }
        if let Ok(last_row) = env::var("SCOREBOARD_LAST_ROW") {
            self.storage.last_row = last_row
                .parse()
                .map_err(|_| anyhow!("Invalid SCOREBOARD_LAST_ROW value: {}", last_row))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    config.rating.validate()?;

    // Validate storage settings
    if config.storage.players_sheet.trim().is_empty() {
        return Err(anyhow!("Players sheet name cannot be empty"));
    }
    if config.storage.games_sheet.trim().is_empty() {
        return Err(anyhow!("Games sheet name cannot be empty"));
    }
    if config.storage.players_sheet == config.storage.games_sheet {
        return Err(anyhow!("Players and games must live on different sheets"));
    }
    if config.storage.last_row < 2 {
        return Err(anyhow!("Last row must leave room for a header and one data row"));
    }

    Ok(())
}
