//! Batch runner: many games on one simulation

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    analysis::{GameSummary, SimulationStats},
    config::SimulationConfig,
    ports::Observer,
    simulation::{Simulation, TaggedOutcome},
};

/// Batch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Label attached to every record of the batch
    pub title: String,

    /// Number of games to play
    pub num_games: usize,

    /// Share of games used for training. A learning player is frozen for
    /// every game whose 0-based index exceeds `train_test_ratio * num_games`.
    pub train_test_ratio: f64,

    /// Clear the learned values before the first game
    pub reset_policy: bool,
}

impl BatchConfig {
    pub fn new(title: impl Into<String>, num_games: usize) -> Self {
        Self {
            title: title.into(),
            num_games,
            train_test_ratio: 1.0,
            reset_policy: false,
        }
    }

    /// Take the train/test split from the simulation configuration.
    pub fn for_simulation(
        title: impl Into<String>,
        num_games: usize,
        config: &SimulationConfig,
    ) -> Self {
        Self {
            train_test_ratio: config.qlearning.train_test_ratio,
            ..Self::new(title, num_games)
        }
    }

    pub fn with_train_test_ratio(mut self, ratio: f64) -> Self {
        self.train_test_ratio = ratio;
        self
    }

    pub fn with_reset_policy(mut self, reset_policy: bool) -> Self {
        self.reset_policy = reset_policy;
        self
    }

    /// First 1-based game played in evaluation mode, if any
    pub fn eval_start(&self) -> Option<usize> {
        let threshold = self.train_test_ratio * self.num_games as f64;
        (1..=self.num_games).find(|&game_no| (game_no - 1) as f64 > threshold)
    }
}

/// Result of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub title: String,

    /// Every record of every game, in emission order
    pub records: Vec<TaggedOutcome>,

    pub games: Vec<GameSummary>,

    /// First game played with a frozen policy (learning players only)
    pub eval_started_game: Option<usize>,

    /// Stored Q-values after the last game (learning players only)
    pub table_size: Option<usize>,

    pub stats: SimulationStats,
}

impl BatchResult {
    /// Statistics restricted to the evaluation phase
    pub fn eval_stats(&self) -> Option<SimulationStats> {
        let start = self.eval_started_game?;
        let records: Vec<TaggedOutcome> = self
            .records
            .iter()
            .filter(|record| record.game_no >= start)
            .cloned()
            .collect();
        Some(SimulationStats::from_records(self.title.as_str(), &records))
    }

    /// Save the statistics to a JSON file
    pub fn save_summary<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &self.stats)?;
        Ok(())
    }
}

/// Plays a batch of games on one simulation and reports to observers
pub struct BatchRunner {
    config: BatchConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the runner
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run the batch.
    ///
    /// Each game is played to completion, its outcomes are drained and
    /// tagged, and the simulation is reset for the next game. Learned values
    /// carry over between games unless `reset_policy` is set, in which case
    /// they are cleared once before the first game.
    pub fn run(&mut self, simulation: &mut Simulation) -> Result<BatchResult> {
        let title = self.config.title.clone();
        let num_games = self.config.num_games;
        let learning = simulation.player().policy().agent().is_some();

        if let Some(agent) = simulation.player_mut().policy_mut().agent_mut() {
            if self.config.reset_policy {
                agent.reset_policy();
            }
            agent.set_eval_mode(false);
        }
        if simulation.status().is_finished() || simulation.current_turn() > 0 {
            simulation.reset()?;
        }
        let stale = simulation.drain_outcomes();
        if !stale.is_empty() {
            debug!("{title}: discarding {} records from an earlier run", stale.len());
        }

        let eval_start = if learning {
            self.config.eval_start()
        } else {
            None
        };

        for observer in &mut self.observers {
            observer.on_batch_start(&title, num_games)?;
        }

        let mut records = Vec::new();
        let mut games = Vec::with_capacity(num_games);
        let mut eval_started_game = None;

        for game_no in 1..=num_games {
            if eval_start == Some(game_no) {
                simulation.player_mut().set_eval_mode(true);
                eval_started_game = Some(game_no);
                info!("{title}: evaluation phase starts at game {game_no} of {num_games}");
            }

            for observer in &mut self.observers {
                observer.on_game_start(game_no)?;
            }

            simulation.run()?;
            let outcomes = simulation.drain_outcomes();

            let summary = GameSummary::from_outcomes(title.as_str(), game_no, &outcomes).map(
                |summary| GameSummary {
                    evaluation: eval_started_game.is_some(),
                    ..summary
                },
            );

            for outcome in outcomes {
                let record = TaggedOutcome {
                    simulation_title: title.clone(),
                    game_no,
                    outcome,
                };
                for observer in &mut self.observers {
                    observer.on_outcome(&record)?;
                }
                records.push(record);
            }

            if let Some(summary) = summary {
                for observer in &mut self.observers {
                    observer.on_game_end(&summary)?;
                }
                games.push(summary);
            }

            simulation.reset()?;
        }

        for observer in &mut self.observers {
            observer.on_batch_end()?;
        }

        simulation.player_mut().set_eval_mode(false);
        let table_size = simulation
            .player()
            .policy()
            .agent()
            .map(|agent| agent.table_size());

        let stats = SimulationStats::from_records(title.as_str(), &records);
        info!(
            "{title}: {} games, win rate {:.3}, bankruptcy rate {:.3}",
            stats.games, stats.win_rate, stats.bankruptcy_rate
        );

        Ok(BatchResult {
            title,
            records,
            games,
            eval_started_game,
            table_size,
            stats,
        })
    }
}
