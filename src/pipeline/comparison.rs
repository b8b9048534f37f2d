//! Comparison framework for running several simulation variants side by side
//!
//! Every variant gets its own simulation (board, player and Q-table). By
//! default the batches share nothing but read-only configuration and run in
//! parallel. When learned values are kept, the variants run one after another
//! and each learning variant starts from the values the previous one ended
//! with.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    config::{PlayerType, SimulationConfig},
    pipeline::batch::{BatchConfig, BatchResult, BatchRunner},
    q_learning::{QTable, RewardStrategy},
    simulation::Simulation,
};

/// One configuration to compare, with the title its records carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationVariant {
    pub title: String,
    pub config: SimulationConfig,
}

impl SimulationVariant {
    pub fn new(title: impl Into<String>, config: SimulationConfig) -> Self {
        Self {
            title: title.into(),
            config,
        }
    }
}

/// One variant per player type
pub fn players(base: &SimulationConfig) -> Vec<SimulationVariant> {
    PlayerType::ALL
        .iter()
        .map(|&player_type| {
            SimulationVariant::new(
                format!("Player: {}", player_type.display_name()),
                base.clone().with_player_type(player_type),
            )
        })
        .collect()
}

/// One learning-player variant per reward strategy
pub fn reward_strategies(base: &SimulationConfig) -> Vec<SimulationVariant> {
    RewardStrategy::ALL
        .iter()
        .map(|&strategy| {
            SimulationVariant::new(
                format!("Reward Strategy: {strategy}"),
                base.clone()
                    .with_player_type(PlayerType::QLearning)
                    .with_reward_strategy(strategy),
            )
        })
        .collect()
}

/// One variant per starting cash amount
pub fn start_cash(base: &SimulationConfig, amounts: &[i64]) -> Vec<SimulationVariant> {
    amounts
        .iter()
        .map(|&amount| {
            SimulationVariant::new(
                format!("Start Cash: {amount}"),
                base.clone().with_start_cash(amount),
            )
        })
        .collect()
}

/// Runs a batch per variant
#[derive(Debug, Clone)]
pub struct ComparisonFramework {
    variants: Vec<SimulationVariant>,
    num_games: usize,
    reset_policy: bool,
}

impl ComparisonFramework {
    pub fn new(variants: Vec<SimulationVariant>, num_games: usize) -> Self {
        Self {
            variants,
            num_games,
            reset_policy: true,
        }
    }

    /// Start every variant from an empty Q-table (the default).
    ///
    /// With `false` the variants run in order and each learning variant
    /// inherits the Q-values of the last learning variant before it. Only
    /// the values carry over: exploration rate and reward strategy come from
    /// the variant's own configuration.
    pub fn with_reset_policy(mut self, reset_policy: bool) -> Self {
        self.reset_policy = reset_policy;
        self
    }

    pub fn variants(&self) -> &[SimulationVariant] {
        &self.variants
    }

    /// Run every variant. Results come back in variant order.
    ///
    /// # Errors
    ///
    /// Fails on the first variant whose configuration does not validate.
    pub fn run(&self) -> Result<Vec<BatchResult>> {
        for variant in &self.variants {
            variant.config.validate()?;
        }
        info!(
            "comparing {} variants over {} games each",
            self.variants.len(),
            self.num_games
        );
        if self.reset_policy {
            return self
                .variants
                .par_iter()
                .map(|variant| self.run_variant(variant, None).map(|(result, _)| result))
                .collect();
        }

        let mut carried: Option<QTable> = None;
        let mut results = Vec::with_capacity(self.variants.len());
        for variant in &self.variants {
            let (result, table) = self.run_variant(variant, carried.as_ref())?;
            if table.is_some() {
                carried = table;
            }
            results.push(result);
        }
        Ok(results)
    }

    /// Play one variant's batch, optionally seeding its learning player with
    /// `inherited` values. Returns the learned table alongside the result.
    fn run_variant(
        &self,
        variant: &SimulationVariant,
        inherited: Option<&QTable>,
    ) -> Result<(BatchResult, Option<QTable>)> {
        let mut simulation = Simulation::from_config(variant.config.clone())?;
        if let (Some(table), Some(agent)) =
            (inherited, simulation.player_mut().policy_mut().agent_mut())
        {
            agent.q_table_mut().copy_values_from(table);
            debug!("{}: starting from {} learned values", variant.title, table.size());
        }
        let batch =
            BatchConfig::for_simulation(variant.title.as_str(), self.num_games, &variant.config);
        let result = BatchRunner::new(batch).run(&mut simulation)?;
        let table = simulation
            .player()
            .policy()
            .agent()
            .map(|agent| agent.q_table().clone());
        Ok((result, table))
    }
}
