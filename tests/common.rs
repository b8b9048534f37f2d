//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use monopoly_sim::{
    PlayerType, SimulationConfig,
    config::{ChanceAction, ChanceEvent},
};

/// A short game on the default board layout.
pub fn short_config(player_type: PlayerType, max_turns: usize) -> SimulationConfig {
    SimulationConfig {
        max_turns,
        ..SimulationConfig::default()
    }
    .with_player_type(player_type)
}

/// A board where every chance field costs money, to force bankruptcies.
pub fn harsh_config(player_type: PlayerType) -> SimulationConfig {
    SimulationConfig {
        board_size: 12,
        start_cash: 400,
        start_passing_cash: 50,
        max_turns: 120,
        tax_fields: 3,
        chance_fields: 2,
        property_fields: 5,
        tax_amount: 80,
        property_price: 150,
        property_rent: 40,
        chance_events: vec![ChanceEvent::new(ChanceAction::Pay, 120, "Repairs")],
        ..SimulationConfig::default()
    }
    .with_player_type(player_type)
}

/// Minimal YAML document accepted by the loader.
pub const CONFIG_YAML: &str = r#"
board_size: 16
die_faces: 6
start_cash: 800
start_passing_cash: 100
max_turns: 60
tax_fields: 2
chance_fields: 3
property_fields: 8
tax_amount: 60
property_price: 120
property_rent: 25
player_type: always_buy
seed: 7
chance_events:
  - action: receive
    amount: 80
    description: Lottery win
  - action: pay
    amount: 60
    description: Speeding fine
  - action: skip
    amount: 0
    description: Lose a turn
"#;
