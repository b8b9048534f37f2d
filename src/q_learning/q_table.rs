//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::q_learning::state::{Action, StateKey};

/// Sparse Q-table mapping (state, action) pairs to Q-values
///
/// Unseen pairs read as `q_init`. The table grows without eviction for the
/// lifetime of the owning agent.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    /// Q-values: (state_key, action) -> Q-value
    q_values: HashMap<(StateKey, Action), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Initial Q-value for unseen state-action pairs
    q_init: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64, q_init: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
            q_init,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &StateKey, action: Action) -> f64 {
        self.q_values
            .get(&(*state, action))
            .copied()
            .unwrap_or(self.q_init)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Maximum Q-value over the given actions, 0.0 when there are none
    pub fn max_q(&self, state: &StateKey, actions: &[Action]) -> f64 {
        if actions.is_empty() {
            return 0.0;
        }
        actions
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// All actions sharing the highest Q-value, in the order given
    pub fn greedy_actions(&self, state: &StateKey, actions: &[Action]) -> Vec<Action> {
        let best = self.max_q(state, actions);
        actions
            .iter()
            .copied()
            .filter(|&action| self.get(state, action) == best)
            .collect()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// `next_state == None` marks a terminal transition (no bootstrap).
    pub fn q_learning_update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: Option<&StateKey>,
    ) {
        let current_q = self.get(&state, action);
        let max_next_q = match next_state {
            Some(next) => self.max_q(next, &Action::ALL),
            None => 0.0,
        };
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state, action, new_q);
    }

    /// Replace the learned values with a copy of `other`'s.
    ///
    /// Learning rate, discount factor and initial value stay this table's own.
    pub fn copy_values_from(&mut self, other: &QTable) {
        self.q_values.clone_from(&other.q_values);
    }

    /// Drop every learned value
    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }
}
