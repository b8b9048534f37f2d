//! The single player of a game
//!
//! A [`Player`] owns its cash, position and deeds plus the [`Policy`] that
//! decides purchases. Payments are check-then-act: a payment the player cannot
//! afford fails with [`Bankruptcy`] and leaves the cash untouched.

pub mod policy;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use policy::Policy;

use crate::{
    board::PropertyField,
    config::{PlayerType, QLearningParams},
    q_learning::{Action, DecisionContext},
};

/// The only in-game failure: a payment larger than the player's cash
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("player has gone bankrupt: cannot pay {amount} with {cash} in cash")]
pub struct Bankruptcy {
    pub amount: i64,
    pub cash: i64,
}

/// A property the player has bought
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deed {
    pub position: usize,
    pub name: String,
    pub price: i64,
    pub rent: i64,
}

#[derive(Debug, Clone)]
pub struct Player {
    cash: i64,
    position: usize,
    properties: Vec<Deed>,
    policy: Policy,
}

impl Player {
    pub fn new(start_cash: i64, policy: Policy) -> Self {
        Self {
            cash: start_cash,
            position: 0,
            properties: Vec::new(),
            policy,
        }
    }

    pub fn always_buy(start_cash: i64) -> Self {
        Self::new(start_cash, Policy::AlwaysBuy)
    }

    pub fn never_buy(start_cash: i64) -> Self {
        Self::new(start_cash, Policy::NeverBuy)
    }

    /// Construct the variant named by `player_type`.
    pub fn from_type(
        player_type: PlayerType,
        start_cash: i64,
        params: &QLearningParams,
        seed: Option<u64>,
    ) -> Self {
        Self::new(start_cash, Policy::from_type(player_type, params, seed))
    }

    pub fn cash(&self) -> i64 {
        self.cash
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn properties(&self) -> &[Deed] {
        &self.properties
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut Policy {
        &mut self.policy
    }

    pub fn player_type(&self) -> PlayerType {
        self.policy.player_type()
    }

    /// Move `steps` fields (negative moves backwards), wrapping around the
    /// board. Returns `(previous, new)` positions.
    pub fn move_by(&mut self, steps: i64, board_size: usize) -> (usize, usize) {
        let previous = self.position;
        if board_size > 0 {
            let size = board_size as i64;
            self.position = (previous as i64 + steps).rem_euclid(size) as usize;
        }
        (previous, self.position)
    }

    /// Pay `amount`, or fail without touching the cash.
    pub fn pay(&mut self, amount: i64) -> Result<(), Bankruptcy> {
        if amount > self.cash {
            return Err(Bankruptcy {
                amount,
                cash: self.cash,
            });
        }
        self.cash -= amount;
        Ok(())
    }

    pub fn receive(&mut self, amount: i64) {
        self.cash += amount;
    }

    /// Offer the property at `position` to the player's policy.
    ///
    /// Returns whether it was bought. A purchase the player cannot afford
    /// fails with [`Bankruptcy`]; a learning policy is punished for that
    /// decision before the failure is returned.
    pub fn buy_property(
        &mut self,
        position: usize,
        property: &PropertyField,
        ctx: &DecisionContext,
    ) -> Result<bool, Bankruptcy> {
        match self.policy.decide(ctx) {
            Action::Skip => Ok(false),
            Action::Buy => {
                if let Err(bankruptcy) = self.pay(property.price) {
                    if let Some(agent) = self.policy.agent_mut() {
                        agent.punish_failed_purchase();
                    }
                    return Err(bankruptcy);
                }
                self.properties.push(Deed {
                    position,
                    name: property.name.clone(),
                    price: property.price,
                    rent: property.rent,
                });
                Ok(true)
            }
        }
    }

    /// Game survived to the turn limit
    pub fn win(&mut self) {
        if let Some(agent) = self.policy.agent_mut() {
            agent.on_win();
        }
    }

    /// Game lost to bankruptcy
    pub fn lose(&mut self) {
        if let Some(agent) = self.policy.agent_mut() {
            agent.on_loss();
        }
    }

    /// Switch a learning policy between training and evaluation.
    /// No effect on rule-based policies.
    pub fn set_eval_mode(&mut self, eval_mode: bool) {
        if let Some(agent) = self.policy.agent_mut() {
            agent.set_eval_mode(eval_mode);
        }
    }

    /// Prepare for a new game. Learned values are kept.
    pub fn reset(&mut self, start_cash: i64) {
        self.cash = start_cash;
        self.position = 0;
        self.properties.clear();
        if let Some(agent) = self.policy.agent_mut() {
            agent.clear_pending();
        }
    }
}
