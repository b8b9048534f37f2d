//! Simulation configuration
//!
//! A [`SimulationConfig`] is loaded from YAML, validated once, and then passed
//! by value into every constructor that needs it. Nothing in the engine reads
//! ambient state.
//!
//! ```
//! use monopoly_sim::config::{PlayerType, SimulationConfig};
//!
//! let config = SimulationConfig::default()
//!     .with_player_type(PlayerType::NeverBuy)
//!     .with_max_turns(50)
//!     .with_seed(7);
//! config.validate()?;
//! # Ok::<(), monopoly_sim::Error>(())
//! ```

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{RewardStrategy, RewardValues, StateEncoding},
};

/// Keys a configuration document must always provide.
pub const REQUIRED_KEYS: [&str; 8] = [
    "board_size",
    "die_faces",
    "start_cash",
    "max_turns",
    "tax_fields",
    "chance_fields",
    "property_fields",
    "player_type",
];

/// Effect of a chance field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanceAction {
    /// Relative repositioning by `amount` fields (may be negative)
    Move,
    /// Pay `amount`
    Pay,
    /// Receive `amount`
    Receive,
    /// Lose the next turn
    Skip,
}

impl ChanceAction {
    pub fn label(&self) -> &'static str {
        match self {
            ChanceAction::Move => "move",
            ChanceAction::Pay => "pay",
            ChanceAction::Receive => "receive",
            ChanceAction::Skip => "skip",
        }
    }
}

impl FromStr for ChanceAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move" => Ok(ChanceAction::Move),
            "pay" => Ok(ChanceAction::Pay),
            "receive" => Ok(ChanceAction::Receive),
            "skip" => Ok(ChanceAction::Skip),
            other => Err(Error::UnknownChanceAction {
                input: other.to_string(),
            }),
        }
    }
}

/// Chance event descriptor drawn into a chance field at board-build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanceEvent {
    pub action: ChanceAction,
    pub amount: i64,
    #[serde(default)]
    pub description: String,
}

impl ChanceEvent {
    pub fn new(action: ChanceAction, amount: i64, description: impl Into<String>) -> Self {
        Self {
            action,
            amount,
            description: description.into(),
        }
    }
}

/// Which buying strategy the player follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerType {
    #[default]
    #[serde(rename = "always_buy")]
    AlwaysBuy,
    #[serde(rename = "never_buy")]
    NeverBuy,
    #[serde(rename = "qlearning")]
    QLearning,
}

impl PlayerType {
    pub const ALL: [PlayerType; 3] = [
        PlayerType::AlwaysBuy,
        PlayerType::NeverBuy,
        PlayerType::QLearning,
    ];

    /// Short label, identical to the configuration token
    pub fn label(&self) -> &'static str {
        match self {
            PlayerType::AlwaysBuy => "always_buy",
            PlayerType::NeverBuy => "never_buy",
            PlayerType::QLearning => "qlearning",
        }
    }

    /// Human readable name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerType::AlwaysBuy => "Always Buy",
            PlayerType::NeverBuy => "Never Buy",
            PlayerType::QLearning => "QLearning",
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlayerType {
    type Err = Error;

    /// Accepts configuration tokens as well as display names such as
    /// `"Always Buy"` or `"QLearning"`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "always_buy" => Ok(PlayerType::AlwaysBuy),
            "never_buy" => Ok(PlayerType::NeverBuy),
            "qlearning" | "q_learning" => Ok(PlayerType::QLearning),
            _ => Err(Error::UnknownPlayerType {
                input: s.to_string(),
            }),
        }
    }
}

/// Q-learning hyperparameters, read from the top level of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningParams {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Exploration rate ε
    pub epsilon: f64,
    /// Multiplicative decay applied to ε after every game
    pub epsilon_decay: f64,
    /// Floor for the decayed ε
    pub min_epsilon: f64,
    pub reward_strategy: RewardStrategy,
    pub rewards: RewardValues,
    /// Share of a batch used for training before switching to evaluation
    pub train_test_ratio: f64,
    pub state_encoding: StateEncoding,
    /// Width of a cash bucket in the state key
    pub cash_bucket: i64,
    /// Width of a turns-left bucket in the state key
    pub turns_bucket: usize,
}

impl Default for QLearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
            reward_strategy: RewardStrategy::default(),
            rewards: RewardValues::default(),
            train_test_ratio: 0.8,
            state_encoding: StateEncoding::default(),
            cash_bucket: 100,
            turns_bucket: 25,
        }
    }
}

impl QLearningParams {
    fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::invalid_config(format!(
                "'alpha' must be in (0, 1], got {}",
                self.alpha
            )));
        }
        for (key, value) in [
            ("gamma", self.gamma),
            ("epsilon", self.epsilon),
            ("min_epsilon", self.min_epsilon),
            ("epsilon_decay", self.epsilon_decay),
            ("train_test_ratio", self.train_test_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_config(format!(
                    "'{key}' must be in [0, 1], got {value}"
                )));
            }
        }
        if self.cash_bucket <= 0 {
            return Err(Error::invalid_config("'cash_bucket' must be positive"));
        }
        if self.turns_bucket == 0 {
            return Err(Error::invalid_config("'turns_bucket' must be positive"));
        }
        Ok(())
    }
}

/// Complete description of one simulated game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub board_size: usize,
    pub die_faces: u32,
    pub start_cash: i64,
    /// Bonus paid whenever a roll carries the player past the start field
    #[serde(default = "default_start_passing_cash")]
    pub start_passing_cash: i64,
    /// Extra cash for landing exactly on the start field (0 disables it)
    #[serde(default)]
    pub start_landing_cash: i64,
    pub max_turns: usize,
    pub tax_fields: usize,
    pub chance_fields: usize,
    pub property_fields: usize,
    #[serde(default = "default_tax_amount")]
    pub tax_amount: i64,
    #[serde(default = "default_property_price")]
    pub property_price: i64,
    #[serde(default = "default_property_rent")]
    pub property_rent: i64,
    #[serde(default = "default_chance_events")]
    pub chance_events: Vec<ChanceEvent>,
    pub player_type: PlayerType,
    #[serde(flatten)]
    pub qlearning: QLearningParams,
    /// Seed for board layout, chance draws, dice and exploration
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_start_passing_cash() -> i64 {
    200
}

fn default_tax_amount() -> i64 {
    50
}

fn default_property_price() -> i64 {
    100
}

fn default_property_rent() -> i64 {
    10
}

/// Chance catalog used when a document does not provide one
pub fn default_chance_events() -> Vec<ChanceEvent> {
    vec![
        ChanceEvent::new(ChanceAction::Receive, 100, "Bank error in your favour"),
        ChanceEvent::new(ChanceAction::Pay, 100, "Doctor's fee"),
        ChanceEvent::new(ChanceAction::Move, 3, "Advance three fields"),
        ChanceEvent::new(ChanceAction::Move, -2, "Go back two fields"),
        ChanceEvent::new(ChanceAction::Skip, 0, "Lose a turn"),
        ChanceEvent::new(ChanceAction::Receive, 50, "Birthday gift"),
    ]
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            board_size: 20,
            die_faces: 6,
            start_cash: 2000,
            start_passing_cash: default_start_passing_cash(),
            start_landing_cash: 0,
            max_turns: 250,
            tax_fields: 4,
            chance_fields: 4,
            property_fields: 10,
            tax_amount: default_tax_amount(),
            property_price: default_property_price(),
            property_rent: default_property_rent(),
            chance_events: default_chance_events(),
            player_type: PlayerType::default(),
            qlearning: QLearningParams::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mapping = document
            .as_mapping()
            .ok_or_else(|| Error::invalid_config("configuration must be a YAML mapping"))?;
        for key in REQUIRED_KEYS {
            if !mapping.contains_key(key) {
                return Err(Error::MissingParameter {
                    key: key.to_string(),
                });
            }
        }

        let config: SimulationConfig = serde_yaml::from_value(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read configuration file '{}'", path.display()),
            source,
        })?;
        log::debug!("validating configuration from {}", path.display());
        Self::from_yaml_str(&contents)
    }

    /// Serialize back to YAML (round-trips through [`Self::from_yaml_str`]).
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every constraint the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 {
            return Err(Error::invalid_config("'board_size' must be a positive integer"));
        }
        if self.die_faces == 0 {
            return Err(Error::invalid_config("'die_faces' must be a positive integer"));
        }
        if self.start_cash <= 0 {
            return Err(Error::invalid_config("'start_cash' must be a positive integer"));
        }
        if self.max_turns == 0 {
            return Err(Error::invalid_config("'max_turns' must be a positive integer"));
        }
        for (key, value) in [
            ("start_passing_cash", self.start_passing_cash),
            ("start_landing_cash", self.start_landing_cash),
            ("tax_amount", self.tax_amount),
            ("property_price", self.property_price),
            ("property_rent", self.property_rent),
        ] {
            if value < 0 {
                return Err(Error::invalid_config(format!(
                    "'{key}' must be a non-negative integer"
                )));
            }
        }

        let total_fields = self.tax_fields + self.chance_fields + self.property_fields;
        if total_fields >= self.board_size {
            return Err(Error::invalid_config(format!(
                "the sum of fields ({total_fields}) does not fit next to the start field on a board of size {}",
                self.board_size
            )));
        }

        if self.chance_fields > 0 && self.chance_events.is_empty() {
            return Err(Error::invalid_config(
                "no chance events defined in the configuration",
            ));
        }
        for event in &self.chance_events {
            if event.action != ChanceAction::Move && event.amount < 0 {
                return Err(Error::invalid_config(format!(
                    "chance event '{}' has a negative amount for action '{}'",
                    event.description,
                    event.action.label()
                )));
            }
        }

        if self.player_type == PlayerType::QLearning {
            self.qlearning.validate()?;
            if self.property_fields == 0 {
                log::warn!("qlearning player configured on a board without property fields");
            }
        }
        Ok(())
    }

    pub fn with_player_type(mut self, player_type: PlayerType) -> Self {
        self.player_type = player_type;
        self
    }

    pub fn with_start_cash(mut self, start_cash: i64) -> Self {
        self.start_cash = start_cash;
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_reward_strategy(mut self, strategy: RewardStrategy) -> Self {
        self.qlearning.reward_strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
board_size: 12
die_faces: 6
start_cash: 1500
max_turns: 100
tax_fields: 2
chance_fields: 2
property_fields: 5
player_type: qlearning
alpha: 0.2
reward_strategy: dense
chance_events:
  - action: pay
    amount: 30
    description: Speeding fine
"#;

    #[test]
    fn test_minimal_document_fills_defaults() {
        let config = SimulationConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(config.board_size, 12);
        assert_eq!(config.player_type, PlayerType::QLearning);
        assert_eq!(config.qlearning.alpha, 0.2);
        assert_eq!(config.qlearning.gamma, 0.9);
        assert_eq!(config.qlearning.reward_strategy, RewardStrategy::Dense);
        assert_eq!(config.tax_amount, 50);
        assert_eq!(config.start_passing_cash, 200);
        assert_eq!(config.chance_events.len(), 1);
        assert_eq!(config.chance_events[0].action, ChanceAction::Pay);
    }

    #[test]
    fn test_missing_required_key() {
        let yaml = MINIMAL.replace("max_turns: 100\n", "");
        let err = SimulationConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, Error::MissingParameter { ref key } if key == "max_turns"));
    }

    #[test]
    fn test_fields_must_fit_board() {
        let config = SimulationConfig {
            board_size: 5,
            tax_fields: 2,
            chance_fields: 1,
            property_fields: 2,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_unknown_player_type_rejected() {
        let yaml = MINIMAL.replace("player_type: qlearning", "player_type: sometimes_buy");
        assert!(SimulationConfig::from_yaml_str(&yaml).is_err());
        assert!(matches!(
            "sometimes_buy".parse::<PlayerType>(),
            Err(Error::UnknownPlayerType { .. })
        ));
    }

    #[test]
    fn test_player_type_display_names() {
        assert_eq!("Always Buy".parse::<PlayerType>().unwrap(), PlayerType::AlwaysBuy);
        assert_eq!("never_buy".parse::<PlayerType>().unwrap(), PlayerType::NeverBuy);
        assert_eq!("QLearning".parse::<PlayerType>().unwrap(), PlayerType::QLearning);
    }

    #[test]
    fn test_invalid_chance_action_rejected() {
        let yaml = MINIMAL.replace("action: pay", "action: steal");
        assert!(SimulationConfig::from_yaml_str(&yaml).is_err());
        assert!("steal".parse::<ChanceAction>().is_err());
    }

    #[test]
    fn test_empty_chance_catalog_rejected() {
        let config = SimulationConfig {
            chance_events: Vec::new(),
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_qlearning_params_checked_only_for_learning_player() {
        let mut config = SimulationConfig::default();
        config.qlearning.alpha = 3.0;
        assert!(config.validate().is_ok());
        let config = config.with_player_type(PlayerType::QLearning);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = SimulationConfig::default()
            .with_player_type(PlayerType::QLearning)
            .with_seed(11);
        let yaml = config.to_yaml_string().unwrap();
        let parsed = SimulationConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
