//! Batch and comparison pipeline
//!
//! This module provides:
//! - a batch runner playing many games on one simulation
//! - a parallel comparison of several simulation variants
//! - observers recording progress, metrics and turn reports

pub mod batch;
pub mod comparison;
pub mod observers;

pub use batch::{BatchConfig, BatchResult, BatchRunner};
pub use comparison::{ComparisonFramework, SimulationVariant};
pub use observers::{
    CsvObserver, CsvRow, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
};

pub use crate::ports::Observer;
