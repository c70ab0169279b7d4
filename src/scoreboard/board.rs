//! The scoreboard: roster and history loaded from a grid store
//!
//! Every mutation that can change ratings ends with a full recompute, so
//! ratings, ranks and win/loss tallies are always derived from the current
//! history. Nothing is written back until [`Scoreboard::flush`].

use crate::config::{AppConfig, StorageSettings};
use crate::error::{Result, ScoreboardError};
use crate::marshal::{decode_all, header_row, to_rows_with_header, Grid, Record, Row};
use crate::metrics::MetricsCollector;
use crate::rating::{History, RecomputeReport, ReplayEngine, Roster};
use crate::storage::{blank_row, GridStore, TargetRange};
use crate::types::{Game, GameId, Player, PlayerId};
use tracing::{debug, info, warn};

/// In-memory scoreboard state
pub struct Scoreboard {
    /// Replay engine used for every recompute
    engine: ReplayEngine,
    /// Sheet names and row bounds
    settings: StorageSettings,
    roster: Roster,
    history: History,
    /// Rows occupied on the players sheet at the last load or flush
    players_extent: usize,
    /// Rows occupied on the games sheet at the last load or flush
    games_extent: usize,
    last_report: RecomputeReport,
    metrics_collector: Option<MetricsCollector>,
}

impl Scoreboard {
    /// Create an empty scoreboard
    pub fn new(engine: ReplayEngine, settings: StorageSettings) -> Self {
        Self {
            engine,
            settings,
            roster: Roster::new(),
            history: History::new(),
            players_extent: 0,
            games_extent: 0,
            last_report: RecomputeReport::default(),
            metrics_collector: None,
        }
    }

    /// Create an empty scoreboard from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let engine = ReplayEngine::elo(config.rating)?;
        Ok(Self::new(engine, config.storage.clone()))
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics_collector: MetricsCollector) -> Self {
        self.metrics_collector = Some(metrics_collector);
        self
    }

    pub fn metrics(&self) -> Option<&MetricsCollector> {
        self.metrics_collector.as_ref()
    }

    pub fn settings(&self) -> &StorageSettings {
        &self.settings
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Report of the most recent recompute
    pub fn last_report(&self) -> &RecomputeReport {
        &self.last_report
    }

    /// Replace the in-memory state with the store's sheets and recompute
    pub fn load(&mut self, store: &dyn GridStore) -> Result<RecomputeReport> {
        let players_grid = self.fetch_sheet(store, &self.settings.players_sheet)?;
        let games_grid = self.fetch_sheet(store, &self.settings.games_sheet)?;

        let players: Vec<Player> = decode_all(&players_grid, None)?;
        let games: Vec<Game> = decode_all(&games_grid, None)?;

        debug!(
            "Decoded {} players and {} games from the store",
            players.len(),
            games.len()
        );

        let roster = Roster::from_players(players)?;
        let history = History::resolve(games, &roster);

        self.players_extent = players_grid.len();
        self.games_extent = games_grid.len();
        self.roster = roster;
        self.history = history;

        let report = self.recompute()?;

        info!(
            "Loaded {} players and {} games",
            self.roster.len(),
            self.history.len()
        );

        Ok(report)
    }

    /// Discard in-memory changes and reload from the store
    pub fn refresh(&mut self, store: &dyn GridStore) -> Result<RecomputeReport> {
        info!("Refreshing scoreboard from the store");
        self.load(store)
    }

    /// Add a player at the base rating, ranked last until the next recompute
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId> {
        let player = Player::new(
            self.roster.next_rank(),
            name.trim(),
            self.engine.calculator().initial_rating(),
        );

        let player_id = self.roster.push(player)?;
        info!("Added player '{}' as {}", name.trim(), player_id);

        // Previously skipped games may name the new player
        self.history.relink(&self.roster);
        if !self.last_report.skipped.is_empty() {
            self.recompute()?;
        }

        if let Some(metrics) = &self.metrics_collector {
            metrics.update_collection_sizes(self.roster.len(), self.history.len());
        }

        Ok(player_id)
    }

    /// Record a game between two known players and recompute
    pub fn add_game(&mut self, winner: &str, loser: &str, was_stalemate: bool) -> Result<GameId> {
        let winner_name = self.player(winner)?.name.clone();
        let loser_name = self.player(loser)?.name.clone();

        let game_id = self.history.push(
            Game::new(winner_name.as_str(), loser_name.as_str(), was_stalemate),
            &self.roster,
        )?;

        if was_stalemate {
            info!(
                "Recorded game #{}: {} drew with {}",
                game_id, winner_name, loser_name
            );
        } else {
            info!(
                "Recorded game #{}: {} beat {}",
                game_id, winner_name, loser_name
            );
        }

        self.recompute()?;
        Ok(game_id)
    }

    /// Remove every game; ratings return to the base rating
    pub fn clear_games(&mut self) -> Result<RecomputeReport> {
        info!("Clearing {} games", self.history.len());
        self.history.clear();
        self.recompute()
    }

    /// Replay the full history and re-derive ratings, ranks and tallies
    pub fn recompute(&mut self) -> Result<RecomputeReport> {
        let timer = self
            .metrics_collector
            .as_ref()
            .map(MetricsCollector::start_timer);

        let report = self.engine.recompute(&mut self.roster, &self.history)?;
        self.tally(&report);

        if let Some(metrics) = &self.metrics_collector {
            let duration = timer.map(|timer| timer.stop()).unwrap_or_default();
            metrics.record_recompute(&report, duration);
            metrics.update_collection_sizes(self.roster.len(), self.history.len());
        }

        self.last_report = report.clone();
        Ok(report)
    }

    /// Write both sheets back, returning the ranges that were written
    pub fn flush(&mut self, store: &dyn GridStore) -> Result<Vec<TargetRange>> {
        let players: Vec<&Player> = self.standings();
        let players_range = self.write_sheet(
            store,
            &self.settings.players_sheet,
            to_rows_with_header(players, Self::header::<Player>()).collect(),
            self.players_extent,
        )?;
        self.players_extent = self.roster.len() + 1;

        let games_range = self.write_sheet(
            store,
            &self.settings.games_sheet,
            to_rows_with_header(self.history.records(), Self::header::<Game>()).collect(),
            self.games_extent,
        )?;

        self.games_extent = self.history.len() + 1;

        info!("Flushed {} and {}", players_range, games_range);
        Ok(vec![players_range, games_range])
    }

    /// Players ordered by rank
    pub fn standings(&self) -> Vec<&Player> {
        self.roster
            .standings()
            .into_iter()
            .map(|(_, player)| player)
            .collect()
    }

    /// Games in play order
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.history.records()
    }

    /// Look a player up by name (case-insensitive)
    pub fn player(&self, name: &str) -> std::result::Result<&Player, ScoreboardError> {
        self.roster
            .find_by_name(name)
            .and_then(|id| self.roster.get(id))
            .ok_or_else(|| ScoreboardError::PlayerNotFound {
                name: name.trim().to_string(),
            })
    }

    fn fetch_sheet(&self, store: &dyn GridStore, sheet: &str) -> Result<Grid> {
        if let Some(metrics) = &self.metrics_collector {
            metrics.record_grid_fetch(sheet);
        }

        match store.fetch_grid(sheet) {
            Ok(grid) => Ok(grid),
            Err(e)
                if matches!(
                    e.downcast_ref::<ScoreboardError>(),
                    Some(ScoreboardError::SheetNotFound { .. })
                ) =>
            {
                warn!("Sheet '{}' not found, starting with no rows", sheet);
                Ok(Grid::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_sheet(
        &self,
        store: &dyn GridStore,
        sheet: &str,
        mut rows: Vec<Row>,
        previous_extent: usize,
    ) -> Result<TargetRange> {
        let width = rows.first().map(Vec::len).unwrap_or_default();

        // Blank rows left over from a longer collection
        let stale_until = previous_extent.min(self.settings.last_row);
        if rows.len() < stale_until {
            debug!(
                "Blanking rows {}..={} of '{}'",
                rows.len() + 1,
                stale_until,
                sheet
            );
            rows.resize(stale_until, blank_row(width));
        }

        let range = TargetRange::new(sheet, 1, rows.len());
        store.store_grid(&range, &rows)?;

        if let Some(metrics) = &self.metrics_collector {
            metrics.record_rows_written(sheet, rows.len());
        }

        Ok(range)
    }

    fn header<T: Record>() -> Row {
        header_row::<T>().unwrap_or_default()
    }

    fn tally(&mut self, report: &RecomputeReport) {
        for player in self.roster.iter_mut() {
            player.wins = 0;
            player.losses = 0;
            player.stalemates = 0;
        }

        for step in &report.steps {
            if step.was_stalemate {
                for id in [step.winner.player_id, step.loser.player_id] {
                    if let Some(player) = self.roster.get_mut(id) {
                        player.stalemates += 1;
                    }
                }
            } else {
                if let Some(player) = self.roster.get_mut(step.winner.player_id) {
                    player.wins += 1;
                }
                if let Some(player) = self.roster.get_mut(step.loser.player_id) {
                    player.losses += 1;
                }
            }
        }
    }
}

impl std::fmt::Debug for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scoreboard")
            .field("engine", &self.engine)
            .field("settings", &self.settings)
            .field("players", &self.roster.len())
            .field("games", &self.history.len())
            .finish()
    }
}
