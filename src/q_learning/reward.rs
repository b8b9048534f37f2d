//! Reward shaping strategies

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, q_learning::state::Action};

/// When and how much reward the agent receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardStrategy {
    /// Only the end of the game is rewarded or punished
    Sparse,
    /// Every decision is rewarded; a loss is still punished, a win is not
    Dense,
    /// Decision shaping plus terminal rewards
    #[default]
    Mixed,
}

impl RewardStrategy {
    pub const ALL: [RewardStrategy; 3] = [
        RewardStrategy::Sparse,
        RewardStrategy::Dense,
        RewardStrategy::Mixed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RewardStrategy::Sparse => "sparse",
            RewardStrategy::Dense => "dense",
            RewardStrategy::Mixed => "mixed",
        }
    }

    /// Reward for a completed buy or skip decision on a property of `price`
    pub fn decision_reward(&self, values: &RewardValues, action: Action, price: i64) -> f64 {
        match self {
            RewardStrategy::Sparse => 0.0,
            RewardStrategy::Dense | RewardStrategy::Mixed => match action {
                Action::Buy => price as f64 * values.buy_factor,
                Action::Skip => price as f64 * values.skip_factor,
            },
        }
    }

    /// Terminal reward for surviving the game, if this strategy pays one
    pub fn win_reward(&self, values: &RewardValues) -> Option<f64> {
        match self {
            RewardStrategy::Sparse | RewardStrategy::Mixed => Some(values.win),
            RewardStrategy::Dense => None,
        }
    }

    /// Terminal punishment for going bankrupt (paid by every strategy)
    pub fn loss_reward(&self, values: &RewardValues) -> f64 {
        values.loss
    }
}

impl fmt::Display for RewardStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RewardStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sparse" => Ok(RewardStrategy::Sparse),
            "dense" => Ok(RewardStrategy::Dense),
            "mixed" => Ok(RewardStrategy::Mixed),
            _ => Err(Error::UnknownRewardStrategy {
                input: s.to_string(),
            }),
        }
    }
}

/// Magnitudes used by the reward strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardValues {
    pub win: f64,
    pub loss: f64,
    /// Buy reward per unit of property price
    pub buy_factor: f64,
    /// Skip reward per unit of property price
    pub skip_factor: f64,
}

impl Default for RewardValues {
    fn default() -> Self {
        Self {
            win: 100.0,
            loss: -100.0,
            buy_factor: 0.1,
            skip_factor: 0.02,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_has_no_decision_reward() {
        let values = RewardValues::default();
        assert_eq!(
            RewardStrategy::Sparse.decision_reward(&values, Action::Buy, 200),
            0.0
        );
        assert_eq!(RewardStrategy::Sparse.win_reward(&values), Some(100.0));
    }

    #[test]
    fn test_dense_rewards_buy_more_than_skip() {
        let values = RewardValues::default();
        let buy = RewardStrategy::Dense.decision_reward(&values, Action::Buy, 200);
        let skip = RewardStrategy::Dense.decision_reward(&values, Action::Skip, 200);
        assert!((buy - 20.0).abs() < 1e-9);
        assert!((skip - 4.0).abs() < 1e-9);
        assert_eq!(RewardStrategy::Dense.win_reward(&values), None);
        assert_eq!(RewardStrategy::Dense.loss_reward(&values), -100.0);
    }

    #[test]
    fn test_mixed_combines_both() {
        let values = RewardValues::default();
        assert!(RewardStrategy::Mixed.decision_reward(&values, Action::Buy, 100) > 0.0);
        assert_eq!(RewardStrategy::Mixed.win_reward(&values), Some(100.0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Sparse".parse::<RewardStrategy>().unwrap(), RewardStrategy::Sparse);
        assert!(matches!(
            "greedy".parse::<RewardStrategy>(),
            Err(Error::UnknownRewardStrategy { .. })
        ));
    }
}
