//! Simulate command - play a batch of games from a configuration file

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    analysis::SimulationStats,
    cli::output::{print_kv, print_section, print_stats, print_subsection},
    config::{PlayerType, SimulationConfig},
    pipeline::{BatchConfig, BatchRunner, CsvObserver, JsonlObserver, ProgressObserver},
    simulation::Simulation,
};

#[derive(Parser, Debug)]
#[command(about = "Play a batch of games")]
pub struct SimulateArgs {
    /// YAML configuration file
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the configured player type (always_buy, never_buy, qlearning)
    #[arg(long = "player-type")]
    pub player_type: Option<String>,

    /// Write every turn to a CSV report
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    player_type: PlayerType,
    games: usize,
    seed: Option<u64>,
    eval_started_game: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SimulationSummaryFile<'a> {
    overall: &'a SimulationStats,
    evaluation: Option<SimulationStats>,
    metadata: SummaryMetadata,
}

pub(crate) fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("simulation_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

pub(crate) fn load_config(path: &Path) -> Result<SimulationConfig> {
    SimulationConfig::from_yaml_file(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

pub fn execute(args: SimulateArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(raw) = &args.player_type {
        config = config.with_player_type(raw.parse()?);
        config.validate()?;
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let title = format!("Player: {}", config.player_type.display_name());
    let mut simulation =
        Simulation::from_config(config.clone()).context("failed to set up the simulation")?;

    let batch = BatchConfig::for_simulation(title.as_str(), args.games, &config);
    let mut runner = BatchRunner::new(batch);
    if !args.no_progress {
        runner = runner.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.csv {
        runner = runner.with_observer(Box::new(CsvObserver::new(path)?));
    }
    if let Some(path) = &args.observations {
        runner = runner.with_observer(Box::new(JsonlObserver::new(path)?));
    }

    let result = runner.run(&mut simulation)?;

    print_section(&title);
    print_kv("Board size", &config.board_size.to_string());
    print_kv("Max turns", &config.max_turns.to_string());
    if let Some(agent) = simulation.player().policy().agent() {
        print_kv("Reward strategy", agent.reward_strategy().label());
        print_kv("Stored Q-values", &agent.table_size().to_string());
    }

    print_subsection("All games");
    print_stats(&result.stats);

    let evaluation = result.eval_stats();
    if let (Some(eval), Some(start)) = (&evaluation, result.eval_started_game) {
        print_subsection(&format!("Evaluation (games {start}..={})", args.games));
        print_stats(eval);
    }

    if let Some(path) = &args.csv {
        println!("\nTurn report written to {}", path.display());
    }
    if let Some(path) = &args.observations {
        println!("Observations written to {}", path.display());
    }

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let summary = SimulationSummaryFile {
            overall: &result.stats,
            evaluation,
            metadata: SummaryMetadata {
                player_type: config.player_type,
                games: args.games,
                seed: config.seed,
                eval_started_game: result.eval_started_game,
            },
        };
        let file = File::create(&summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", summary_path.display());
    }

    Ok(())
}
