//! Command line entry point of the Monopoly simulator
//!
//! - `simulate`: play a batch of games and print their statistics
//! - `compare`: run preset variants in parallel and tabulate them

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "monopoly-sim")]
#[command(version, about = "Single-player Monopoly simulator with a Q-learning buyer", long_about = None)]
struct Cli {
    /// Log every turn (debug level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a batch of games from a configuration file
    Simulate(monopoly_sim::cli::commands::simulate::SimulateArgs),

    /// Compare preset simulation variants side by side
    Compare(monopoly_sim::cli::commands::compare::CompareArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Simulate(args) => monopoly_sim::cli::commands::simulate::execute(args),
        Commands::Compare(args) => monopoly_sim::cli::commands::compare::execute(args),
    }
}
