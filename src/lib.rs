//! Single-player Monopoly simulation with a Q-learning buying policy
//!
//! This crate provides:
//! - A procedurally generated circular board of start, tax, chance and
//!   property fields
//! - A turn engine that plays one game to a win or bankruptcy and emits one
//!   record per turn
//! - Rule-based and tabular Q-learning players deciding property purchases
//! - Batch and comparison pipelines with progress, CSV and JSONL observers
//! - Aggregated statistics over many games

pub mod analysis;
pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod player;
pub mod ports;
pub mod q_learning;
pub mod simulation;

pub use board::{Board, Field, FieldKind, PropertyField};
pub use config::{ChanceAction, ChanceEvent, PlayerType, QLearningParams, SimulationConfig};
pub use error::{Error, Result};
pub use player::{Bankruptcy, Player, Policy};
pub use q_learning::{QLearningAgent, RewardStrategy};
pub use simulation::{
    Dice, EndGameStatus, GameStatus, Simulation, TaggedOutcome, TurnEvent, TurnOutcome,
};
