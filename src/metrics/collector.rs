//! Metrics collection using Prometheus
//!
//! Every collector owns its registry, so several scoreboards (or tests) can
//! live in one process without clashing on metric names.

use crate::rating::RecomputeReport;
use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector for the scoreboard
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Replay and roster metrics
    replay_metrics: ReplayMetrics,

    /// Grid store traffic
    storage_metrics: StorageMetrics,
}

/// Replay and roster metrics
#[derive(Clone)]
pub struct ReplayMetrics {
    /// Total recomputes run
    pub recomputes_total: IntCounter,

    /// Total games fed through the rating calculator
    pub games_replayed_total: IntCounter,

    /// Total games left out of a replay (unresolved names or self-play)
    pub skipped_games_total: IntCounter,

    /// Players currently on the roster
    pub players: IntGauge,

    /// Games currently in the history
    pub games: IntGauge,

    /// Wall time of a full recompute
    pub recompute_duration: Histogram,
}

/// Grid store traffic
#[derive(Clone)]
pub struct StorageMetrics {
    /// Grid fetches by sheet
    pub grid_fetches_total: IntCounterVec,

    /// Rows written by sheet
    pub rows_written_total: IntCounterVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let replay_metrics = ReplayMetrics::new(&registry)?;
        let storage_metrics = StorageMetrics::new(&registry)?;

        Ok(Self {
            registry,
            replay_metrics,
            storage_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn replay(&self) -> &ReplayMetrics {
        &self.replay_metrics
    }

    pub fn storage(&self) -> &StorageMetrics {
        &self.storage_metrics
    }

    /// Record a finished recompute
    pub fn record_recompute(&self, report: &RecomputeReport, duration: Duration) {
        self.replay_metrics.recomputes_total.inc();
        self.replay_metrics
            .games_replayed_total
            .inc_by(report.games_replayed as u64);
        self.replay_metrics
            .skipped_games_total
            .inc_by(report.games_skipped() as u64);
        self.replay_metrics
            .recompute_duration
            .observe(duration.as_secs_f64());
    }

    /// Update roster and history sizes
    pub fn update_collection_sizes(&self, players: usize, games: usize) {
        self.replay_metrics.players.set(players as i64);
        self.replay_metrics.games.set(games as i64);
    }

    pub fn record_grid_fetch(&self, sheet: &str) {
        self.storage_metrics
            .grid_fetches_total
            .with_label_values(&[sheet])
            .inc();
    }

    pub fn record_rows_written(&self, sheet: &str, rows: usize) {
        self.storage_metrics
            .rows_written_total
            .with_label_values(&[sheet])
            .inc_by(rows as u64);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }

    /// Render every registered metric in the Prometheus text format
    pub fn gather_text(&self) -> Result<String> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to encode metrics: {}", e))?;

        Ok(String::from_utf8(buffer)?)
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ReplayMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let recomputes_total =
            IntCounter::new("scoreboard_recomputes_total", "Total rating recomputes")?;
        registry.register(Box::new(recomputes_total.clone()))?;

        let games_replayed_total = IntCounter::new(
            "scoreboard_games_replayed_total",
            "Total games replayed through the rating calculator",
        )?;
        registry.register(Box::new(games_replayed_total.clone()))?;

        let skipped_games_total = IntCounter::new(
            "scoreboard_skipped_games_total",
            "Total games skipped during replay",
        )?;
        registry.register(Box::new(skipped_games_total.clone()))?;

        let players = IntGauge::new("scoreboard_players", "Players on the roster")?;
        registry.register(Box::new(players.clone()))?;

        let games = IntGauge::new("scoreboard_games", "Games in the history")?;
        registry.register(Box::new(games.clone()))?;

        let recompute_duration = Histogram::with_opts(
            HistogramOpts::new(
                "scoreboard_recompute_duration_seconds",
                "Full recompute time",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;
        registry.register(Box::new(recompute_duration.clone()))?;

        Ok(Self {
            recomputes_total,
            games_replayed_total,
            skipped_games_total,
            players,
            games,
            recompute_duration,
        })
    }
}

impl StorageMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let grid_fetches_total = IntCounterVec::new(
            Opts::new("scoreboard_grid_fetches_total", "Grids fetched from the store"),
            &["sheet"],
        )?;
        registry.register(Box::new(grid_fetches_total.clone()))?;

        let rows_written_total = IntCounterVec::new(
            Opts::new("scoreboard_rows_written_total", "Rows written to the store"),
            &["sheet"],
        )?;
        registry.register(Box::new(rows_written_total.clone()))?;

        Ok(Self {
            grid_fetches_total,
            rows_written_total,
        })
    }
}
