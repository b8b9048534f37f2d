//! CLI infrastructure for the simulator
//!
//! This module provides the command-line interface for running batches of
//! games and comparing simulation variants.

pub mod commands;
pub mod output;
