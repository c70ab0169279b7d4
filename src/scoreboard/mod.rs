//! Scoreboard use case
//!
//! Ties the marshaller, the rating engine and a grid store together: load
//! sheets, mutate the roster and history, recompute, flush.

pub mod board;

pub use board::Scoreboard;
