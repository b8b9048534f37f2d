//! Aggregation of tagged turn outcomes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::simulation::{EndGameStatus, TaggedOutcome, TurnEvent, TurnOutcome};

/// What happened in one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub simulation_title: String,
    pub game_no: usize,
    /// Turn index of the terminal record
    pub turns_played: usize,
    pub final_cash: i64,
    pub end_status: EndGameStatus,
    pub properties_bought: usize,
    pub rent_paid: i64,
    /// Played with a frozen policy
    pub evaluation: bool,
}

impl GameSummary {
    /// Summarize the records of one game. Returns `None` when no terminal
    /// record is present.
    pub fn from_outcomes(
        simulation_title: impl Into<String>,
        game_no: usize,
        outcomes: &[TurnOutcome],
    ) -> Option<Self> {
        let terminal = outcomes.iter().rfind(|o| o.is_terminal())?;
        let properties_bought = outcomes
            .iter()
            .filter(|o| o.event == TurnEvent::PropertyPurchase)
            .count();
        let rent_paid = outcomes
            .iter()
            .filter(|o| o.event == TurnEvent::RentPayment)
            .map(|o| -o.amount)
            .sum();
        Some(Self {
            simulation_title: simulation_title.into(),
            game_no,
            turns_played: terminal.turn,
            final_cash: terminal.player_cash,
            end_status: terminal.end_game_status?,
            properties_bought,
            rent_paid,
            evaluation: false,
        })
    }

    pub fn is_win(&self) -> bool {
        self.end_status == EndGameStatus::Win
    }
}

/// Aggregate view of a batch of games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub simulation_title: String,
    pub games: usize,
    pub wins: usize,
    pub bankruptcies: usize,
    pub win_rate: f64,
    pub bankruptcy_rate: f64,
    /// `None` when no game went bankrupt
    pub mean_turns_before_bankruptcy: Option<f64>,
    pub mean_final_cash: f64,
    pub std_final_cash: f64,
    pub mean_properties_bought: f64,
    /// Purchases per property name
    pub property_purchases: BTreeMap<String, usize>,
    /// Rent collected per property name
    pub rent_revenue: BTreeMap<String, i64>,
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().mean()
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    }
}

impl SimulationStats {
    /// Aggregate the tagged records of one simulation.
    ///
    /// Records are grouped by `game_no`; games without a terminal record
    /// are ignored.
    pub fn from_records(simulation_title: impl Into<String>, records: &[TaggedOutcome]) -> Self {
        let simulation_title = simulation_title.into();
        let mut by_game: BTreeMap<usize, Vec<TurnOutcome>> = BTreeMap::new();
        for record in records {
            by_game
                .entry(record.game_no)
                .or_default()
                .push(record.outcome.clone());
        }
        let summaries: Vec<GameSummary> = by_game
            .iter()
            .filter_map(|(game_no, outcomes)| {
                GameSummary::from_outcomes(simulation_title.as_str(), *game_no, outcomes)
            })
            .collect();

        let mut stats = Self::from_summaries(simulation_title, &summaries);
        for record in records {
            let outcome = &record.outcome;
            match outcome.event {
                TurnEvent::PropertyPurchase => {
                    *stats
                        .property_purchases
                        .entry(outcome.subject().to_string())
                        .or_default() += 1;
                }
                TurnEvent::RentPayment => {
                    *stats
                        .rent_revenue
                        .entry(outcome.subject().to_string())
                        .or_default() += -outcome.amount;
                }
                _ => {}
            }
        }
        stats
    }

    /// Aggregate game summaries (no per-property breakdown).
    pub fn from_summaries(simulation_title: impl Into<String>, summaries: &[GameSummary]) -> Self {
        let games = summaries.len();
        let wins = summaries.iter().filter(|s| s.is_win()).count();
        let bankruptcies = games - wins;

        let bankrupt_turns: Vec<f64> = summaries
            .iter()
            .filter(|s| !s.is_win())
            .map(|s| s.turns_played as f64)
            .collect();
        let final_cash: Vec<f64> = summaries.iter().map(|s| s.final_cash as f64).collect();
        let bought: Vec<f64> = summaries
            .iter()
            .map(|s| s.properties_bought as f64)
            .collect();

        Self {
            simulation_title: simulation_title.into(),
            games,
            wins,
            bankruptcies,
            win_rate: rate(wins, games),
            bankruptcy_rate: rate(bankruptcies, games),
            mean_turns_before_bankruptcy: (!bankrupt_turns.is_empty())
                .then(|| mean(&bankrupt_turns)),
            mean_final_cash: mean(&final_cash),
            std_final_cash: std_dev(&final_cash),
            mean_properties_bought: mean(&bought),
            property_purchases: BTreeMap::new(),
            rent_revenue: BTreeMap::new(),
        }
    }
}
