//! Buying policies
//!
//! Tagged variants rather than trait objects: the engine matches on the
//! variant, and the learning variant carries its agent.

use std::fmt;

use crate::{
    Result,
    config::{PlayerType, QLearningParams},
    q_learning::{Action, DecisionContext, QLearningAgent},
};

/// How a player answers "buy this property?"
#[derive(Debug, Clone)]
pub enum Policy {
    AlwaysBuy,
    NeverBuy,
    QLearning(Box<QLearningAgent>),
}

impl Policy {
    /// Build the policy for a player type.
    ///
    /// `seed` only affects the learning variant's exploration.
    pub fn from_type(player_type: PlayerType, params: &QLearningParams, seed: Option<u64>) -> Self {
        match player_type {
            PlayerType::AlwaysBuy => Policy::AlwaysBuy,
            PlayerType::NeverBuy => Policy::NeverBuy,
            PlayerType::QLearning => {
                let mut agent = QLearningAgent::new(params);
                agent.reseed(seed);
                Policy::QLearning(Box::new(agent))
            }
        }
    }

    /// Factory keyed by the textual player type.
    ///
    /// # Errors
    ///
    /// Unknown tokens fail with [`crate::Error::UnknownPlayerType`].
    pub fn from_name(name: &str, params: &QLearningParams, seed: Option<u64>) -> Result<Self> {
        Ok(Self::from_type(name.parse()?, params, seed))
    }

    pub fn player_type(&self) -> PlayerType {
        match self {
            Policy::AlwaysBuy => PlayerType::AlwaysBuy,
            Policy::NeverBuy => PlayerType::NeverBuy,
            Policy::QLearning(_) => PlayerType::QLearning,
        }
    }

    pub(crate) fn decide(&mut self, ctx: &DecisionContext) -> Action {
        match self {
            Policy::AlwaysBuy => Action::Buy,
            Policy::NeverBuy => Action::Skip,
            Policy::QLearning(agent) => agent.decide(ctx),
        }
    }

    pub fn agent(&self) -> Option<&QLearningAgent> {
        match self {
            Policy::QLearning(agent) => Some(agent.as_ref()),
            _ => None,
        }
    }

    pub fn agent_mut(&mut self) -> Option<&mut QLearningAgent> {
        match self {
            Policy::QLearning(agent) => Some(agent.as_mut()),
            _ => None,
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::QLearning(agent) => write!(
                f,
                "{} ({})",
                PlayerType::QLearning.display_name(),
                agent.reward_strategy()
            ),
            other => f.write_str(other.player_type().display_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_factory_by_name() {
        let params = QLearningParams::default();
        let policy = Policy::from_name("qlearning", &params, Some(1)).unwrap();
        assert_eq!(policy.player_type(), PlayerType::QLearning);
        assert!(policy.agent().is_some());

        let policy = Policy::from_name("never_buy", &params, None).unwrap();
        assert_eq!(policy.player_type(), PlayerType::NeverBuy);
        assert!(policy.agent().is_none());

        assert!(matches!(
            Policy::from_name("gambler", &params, None),
            Err(Error::UnknownPlayerType { .. })
        ));
    }
}
