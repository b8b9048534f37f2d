//! Observer implementations
//!
//! Progress display, in-memory metrics and file exports of the tagged turn
//! outcomes.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    analysis::GameSummary,
    ports::Observer,
    simulation::{EndGameStatus, TaggedOutcome},
};

/// Progress bar observer - shows batch progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    bankruptcies: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            bankruptcies: 0,
        }
    }

    fn message(&self) -> String {
        format!("W:{} B:{}", self.wins, self.bankruptcies)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_batch_start(&mut self, title: &str, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        pb.set_prefix(title.to_string());
        self.progress_bar = Some(pb);
        self.wins = 0;
        self.bankruptcies = 0;
        Ok(())
    }

    fn on_game_end(&mut self, summary: &GameSummary) -> Result<()> {
        match summary.end_status {
            EndGameStatus::Win => self.wins += 1,
            EndGameStatus::Bankruptcy => self.bankruptcies += 1,
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.game_no as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_batch_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - win and bankruptcy counts of a batch
#[derive(Debug, Default)]
pub struct MetricsObserver {
    wins: usize,
    bankruptcies: usize,
    total_games: usize,
    turns: Vec<usize>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_games as f64
        }
    }

    pub fn bankruptcy_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            self.bankruptcies as f64 / self.total_games as f64
        }
    }

    pub fn avg_game_length(&self) -> f64 {
        if self.turns.is_empty() {
            0.0
        } else {
            self.turns.iter().sum::<usize>() as f64 / self.turns.len() as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_games: self.total_games,
            wins: self.wins,
            bankruptcies: self.bankruptcies,
            win_rate: self.win_rate(),
            bankruptcy_rate: self.bankruptcy_rate(),
            avg_game_length: self.avg_game_length(),
        }
    }
}

/// Snapshot of [`MetricsObserver`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub wins: usize,
    pub bankruptcies: usize,
    pub win_rate: f64,
    pub bankruptcy_rate: f64,
    pub avg_game_length: f64,
}

impl Observer for MetricsObserver {
    fn on_game_end(&mut self, summary: &GameSummary) -> Result<()> {
        self.total_games += 1;
        self.turns.push(summary.turns_played);
        match summary.end_status {
            EndGameStatus::Win => self.wins += 1,
            EndGameStatus::Bankruptcy => self.bankruptcies += 1,
        }
        Ok(())
    }
}

/// JSONL observer - one tagged record per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_outcome(&mut self, record: &TaggedOutcome) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_game_end(&mut self, _summary: &GameSummary) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn on_batch_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Flat CSV row in report column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    pub simulation_title: String,
    pub game_no: usize,
    pub turn: usize,
    pub player_position: usize,
    pub player_cash: i64,
    pub properties_owned: usize,
    pub event: String,
    pub description: String,
    pub amount: i64,
    pub end_game_status: Option<String>,
}

impl From<&TaggedOutcome> for CsvRow {
    fn from(record: &TaggedOutcome) -> Self {
        let outcome = &record.outcome;
        Self {
            simulation_title: record.simulation_title.clone(),
            game_no: record.game_no,
            turn: outcome.turn,
            player_position: outcome.player_position,
            player_cash: outcome.player_cash,
            properties_owned: outcome.properties_owned,
            event: outcome.event.label().to_string(),
            description: outcome.description.clone(),
            amount: outcome.amount,
            end_game_status: outcome.end_game_status.map(|s| s.label().to_string()),
        }
    }
}

/// CSV observer - the tabular report of every turn
pub struct CsvObserver {
    writer: csv::Writer<File>,
}

impl CsvObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl Observer for CsvObserver {
    fn on_outcome(&mut self, record: &TaggedOutcome) -> Result<()> {
        self.writer.serialize(CsvRow::from(record))?;
        Ok(())
    }

    fn on_batch_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
