//! Metrics for the scoreboard
//!
//! Replay and storage counters are kept in a per-collector Prometheus
//! registry and rendered on demand in the text exposition format.

pub mod collector;

pub use collector::{MetricsCollector, MetricsTimer, ReplayMetrics, StorageMetrics};
