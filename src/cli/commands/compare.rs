//! Compare command - run preset simulation variants side by side

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};

use crate::{
    cli::{
        commands::simulate::load_config,
        output::{print_comparison_table, print_section},
    },
    pipeline::{ComparisonFramework, CsvObserver, Observer, comparison},
};

/// Which comparison to run
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Every player type on the same configuration
    Players,
    /// A learning player under each reward strategy
    RewardStrategies,
    /// The configured player with different starting cash
    StartCash,
}

#[derive(Parser, Debug)]
#[command(about = "Compare simulation variants")]
pub struct CompareArgs {
    #[arg(value_enum)]
    pub preset: Preset,

    /// YAML configuration file all variants start from
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Number of games per variant
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Override the configured turn limit
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Starting cash amounts for the start-cash preset
    #[arg(long = "start-cash", num_args = 1.., default_values_t = [500, 1000, 1500, 2000])]
    pub start_cash: Vec<i64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Carry learned values from one variant to the next (runs variants in order)
    #[arg(long)]
    pub keep_policy: bool,

    /// Write every turn of every variant to a CSV report
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let mut base = load_config(&args.config)?;
    if let Some(max_turns) = args.max_turns {
        base = base.with_max_turns(max_turns);
    }
    if let Some(seed) = args.seed {
        base = base.with_seed(seed);
    }

    let variants = match args.preset {
        Preset::Players => comparison::players(&base),
        Preset::RewardStrategies => comparison::reward_strategies(&base),
        Preset::StartCash => comparison::start_cash(&base, &args.start_cash),
    };
    if variants.is_empty() {
        bail!("nothing to compare");
    }

    println!("Comparing {} variants:", variants.len());
    for (i, variant) in variants.iter().enumerate() {
        println!("  {}: {}", i + 1, variant.title);
    }
    println!("\nGames per variant: {}", args.games);

    let framework =
        ComparisonFramework::new(variants, args.games).with_reset_policy(!args.keep_policy);
    let results = framework.run()?;

    print_section("Comparison Results");
    print_comparison_table(&results);

    if let Some(path) = &args.csv {
        let mut observer = CsvObserver::new(path)?;
        for record in results.iter().flat_map(|result| result.records.iter()) {
            observer.on_outcome(record)?;
        }
        observer.on_batch_end()?;
        println!("\nResults exported to: {}", path.display());
    }

    Ok(())
}
