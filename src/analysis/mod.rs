//! Aggregation of simulation outcomes into per-game and per-simulation
//! statistics

pub mod stats;

pub use stats::{GameSummary, SimulationStats};
