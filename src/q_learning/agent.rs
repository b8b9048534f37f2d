//! Q-learning purchase agent
//!
//! The agent learns online. A decision stays pending until the next decision
//! point of the same game: its value is then updated toward that state. The
//! last decision of a game is closed by the terminal reward instead.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    config::QLearningParams,
    q_learning::{
        q_table::QTable,
        reward::{RewardStrategy, RewardValues},
        state::{Action, DecisionContext, StateEncoder, StateKey},
    },
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// A decision awaiting its successor state or the end of the game
#[derive(Debug, Clone, Copy, PartialEq)]
struct Decision {
    state: StateKey,
    action: Action,
    reward: f64,
}

/// Q-learning agent deciding whether to buy properties
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    encoder: StateEncoder,
    reward_strategy: RewardStrategy,
    rewards: RewardValues,
    epsilon: f64,
    initial_epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    eval_mode: bool,
    last_decision: Option<Decision>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new agent with an empty Q-table
    pub fn new(params: &QLearningParams) -> Self {
        Self {
            q_table: QTable::new(params.alpha, params.gamma, 0.0),
            encoder: StateEncoder::new(
                params.state_encoding,
                params.cash_bucket,
                params.turns_bucket,
            ),
            reward_strategy: params.reward_strategy,
            rewards: params.rewards,
            epsilon: params.epsilon,
            initial_epsilon: params.epsilon,
            epsilon_decay: params.epsilon_decay,
            min_epsilon: params.min_epsilon,
            eval_mode: false,
            last_decision: None,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(Some(seed));
        self
    }

    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = build_rng(seed);
        self.rng_seed = seed;
    }

    /// Freeze (or unfreeze) the policy.
    ///
    /// While frozen no Q-value changes and no exploration happens: actions are
    /// greedy, with ties still broken uniformly at random.
    pub fn set_eval_mode(&mut self, eval_mode: bool) {
        self.eval_mode = eval_mode;
    }

    pub fn is_eval_mode(&self) -> bool {
        self.eval_mode
    }

    /// Stored exploration rate (kept while eval mode is active)
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Exploration rate actually used for the next decision
    pub fn effective_epsilon(&self) -> f64 {
        if self.eval_mode { 0.0 } else { self.epsilon }
    }

    pub fn reward_strategy(&self) -> RewardStrategy {
        self.reward_strategy
    }

    pub fn q_value(&self, state: &StateKey, action: Action) -> f64 {
        self.q_table.get(state, action)
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn table_size(&self) -> usize {
        self.q_table.size()
    }

    pub fn encode(&self, ctx: &DecisionContext) -> StateKey {
        self.encoder.encode(ctx)
    }

    /// ε-greedy action selection with random tie-breaking among maximizers
    fn select_action(&mut self, state: &StateKey) -> Action {
        let epsilon = self.effective_epsilon();
        if epsilon > 0.0 && self.rng.random::<f64>() < epsilon {
            // Explore: random action
            return *Action::ALL.choose(&mut self.rng).unwrap_or(&Action::Skip);
        }
        let best = self.q_table.greedy_actions(state, &Action::ALL);
        best.choose(&mut self.rng).copied().unwrap_or(Action::Skip)
    }

    /// Choose buy or skip for the given context and remember the decision.
    ///
    /// A decision still pending from earlier in the game is updated first,
    /// bootstrapping from the state of this decision point.
    pub fn decide(&mut self, ctx: &DecisionContext) -> Action {
        let state = self.encoder.encode(ctx);
        if let Some(previous) = self.last_decision.take()
            && !self.eval_mode
        {
            self.q_table.q_learning_update(
                previous.state,
                previous.action,
                previous.reward,
                Some(&state),
            );
        }
        let action = self.select_action(&state);
        let reward =
            self.reward_strategy
                .decision_reward(&self.rewards, action, ctx.property_price);
        self.last_decision = Some(Decision {
            state,
            action,
            reward,
        });
        action
    }

    /// Close the pending decision with a terminal update.
    fn settle(&mut self, terminal_reward: impl FnOnce(&Decision) -> f64) {
        if let Some(decision) = self.last_decision.take()
            && !self.eval_mode
        {
            let reward = terminal_reward(&decision);
            self.q_table
                .q_learning_update(decision.state, decision.action, reward, None);
        }
    }

    /// Punish a buy that could not be paid for.
    ///
    /// The decision is consumed, so the loss hook that follows does not
    /// punish it a second time.
    pub fn punish_failed_purchase(&mut self) {
        let punishment = self.reward_strategy.loss_reward(&self.rewards);
        self.settle(|_| punishment);
    }

    /// Terminal hook: the player survived every turn.
    pub fn on_win(&mut self) {
        let bonus = self.reward_strategy.win_reward(&self.rewards).unwrap_or(0.0);
        self.settle(|decision| decision.reward + bonus);
        self.end_episode();
    }

    /// Terminal hook: the player went bankrupt.
    pub fn on_loss(&mut self) {
        let punishment = self.reward_strategy.loss_reward(&self.rewards);
        self.settle(|decision| decision.reward + punishment);
        self.end_episode();
    }

    /// Forget the pending decision without learning from it (new game).
    pub fn clear_pending(&mut self) {
        self.last_decision = None;
    }

    /// Clear learned values and restore the initial exploration rate.
    pub fn reset_policy(&mut self) {
        self.q_table.reset();
        self.epsilon = self.initial_epsilon;
        self.last_decision = None;
        self.reseed(self.rng_seed);
    }

    fn end_episode(&mut self) {
        self.last_decision = None;
        if !self.eval_mode {
            self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::state::StateEncoding;

    fn params(strategy: RewardStrategy, epsilon: f64) -> QLearningParams {
        QLearningParams {
            alpha: 0.5,
            gamma: 0.9,
            epsilon,
            reward_strategy: strategy,
            state_encoding: StateEncoding::Compact,
            ..QLearningParams::default()
        }
    }

    fn ctx(cash: i64, owned: usize) -> DecisionContext {
        DecisionContext {
            property_price: 100,
            cash,
            turns_left: 50,
            properties_owned: owned,
        }
    }

    #[test]
    fn test_greedy_choice_follows_q_values() {
        let mut agent = QLearningAgent::new(&params(RewardStrategy::Mixed, 0.0)).with_seed(1);
        let state = agent.encode(&ctx(1000, 0));
        agent.q_table_mut().set(state, Action::Skip, 5.0);
        for _ in 0..20 {
            assert_eq!(agent.decide(&ctx(1000, 0)), Action::Skip);
        }
    }

    #[test]
    fn test_ties_are_broken_randomly() {
        let mut agent = QLearningAgent::new(&params(RewardStrategy::Mixed, 0.0)).with_seed(9);
        let mut seen_buy = false;
        let mut seen_skip = false;
        for _ in 0..64 {
            match agent.decide(&ctx(1000, 0)) {
                Action::Buy => seen_buy = true,
                Action::Skip => seen_skip = true,
            }
        }
        assert!(seen_buy && seen_skip);
    }

    #[test]
    fn test_dense_buy_update() {
        let mut agent = QLearningAgent::new(&params(RewardStrategy::Dense, 0.0)).with_seed(2);
        let state = agent.encode(&ctx(1000, 0));
        agent.q_table_mut().set(state, Action::Skip, -1.0);
        assert_eq!(agent.decide(&ctx(1000, 0)), Action::Buy);
        assert_eq!(agent.q_value(&state, Action::Buy), 0.0);
        agent.decide(&ctx(900, 1));
        // 0 + 0.5 * (100 * 0.1 + 0.9 * 0 - 0) = 5.0
        assert!((agent.q_value(&state, Action::Buy) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_skip_bootstraps_from_next_decision_point() {
        let mut agent = QLearningAgent::new(&params(RewardStrategy::Dense, 0.0)).with_seed(10);
        let here = agent.encode(&ctx(1000, 0));
        let next = agent.encode(&ctx(500, 2));
        assert_ne!(here, next);
        agent.q_table_mut().set(here, Action::Buy, -1.0);
        agent.q_table_mut().set(next, Action::Buy, 20.0);

        assert_eq!(agent.decide(&ctx(1000, 0)), Action::Skip);
        assert_eq!(agent.decide(&ctx(500, 2)), Action::Buy);
        // 0 + 0.5 * (100 * 0.02 + 0.9 * 20 - 0) = 10.0
        assert!((agent.q_value(&here, Action::Skip) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_sparse_decisions_only_learn_at_the_end() {
        let mut agent = QLearningAgent::new(&params(RewardStrategy::Sparse, 0.0)).with_seed(3);
        let state = agent.encode(&ctx(1000, 0));
        agent.q_table_mut().set(state, Action::Skip, -1.0);
        agent.decide(&ctx(1000, 0));
        assert_eq!(agent.q_value(&state, Action::Buy), 0.0);

        agent.on_win();
        // 0 + 0.5 * (100 - 0) = 50
        assert!((agent.q_value(&state, Action::Buy) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_dense_win_adds_no_bonus() {
        let mut agent = QLearningAgent::new(&params(RewardStrategy::Dense, 0.0)).with_seed(4);
        let state = agent.encode(&ctx(1000, 0));
        agent.q_table_mut().set(state, Action::Skip, -1.0);
        agent.decide(&ctx(1000, 0));
        agent.on_win();
        // Only the shaped reward of the buy: 0 + 0.5 * (10 - 0) = 5
        assert!((agent.q_value(&state, Action::Buy) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_failed_purchase_is_punished_once() {
        let mut agent = QLearningAgent::new(&params(RewardStrategy::Mixed, 0.0)).with_seed(5);
        let state = agent.encode(&ctx(50, 0));
        agent.q_table_mut().set(state, Action::Skip, -1.0);
        assert_eq!(agent.decide(&ctx(50, 0)), Action::Buy);
        agent.punish_failed_purchase();
        agent.on_loss();
        // 0 + 0.5 * (-100 - 0) = -50, applied exactly once
        assert!((agent.q_value(&state, Action::Buy) + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_eval_mode_freezes_learning_and_exploration() {
        let mut agent = QLearningAgent::new(&params(RewardStrategy::Mixed, 1.0)).with_seed(6);
        agent.set_eval_mode(true);
        assert_eq!(agent.effective_epsilon(), 0.0);
        assert_eq!(agent.epsilon(), 1.0);

        let state = agent.encode(&ctx(1000, 0));
        agent.q_table_mut().set(state, Action::Buy, 3.0);
        for _ in 0..20 {
            assert_eq!(agent.decide(&ctx(1000, 0)), Action::Buy);
        }
        agent.on_loss();
        assert_eq!(agent.q_value(&state, Action::Buy), 3.0);
        assert_eq!(agent.table_size(), 1);
    }

    #[test]
    fn test_epsilon_decays_per_game() {
        let mut params = params(RewardStrategy::Mixed, 0.5);
        params.epsilon_decay = 0.5;
        params.min_epsilon = 0.1;
        let mut agent = QLearningAgent::new(&params).with_seed(7);
        agent.on_win();
        assert!((agent.epsilon() - 0.25).abs() < 1e-9);
        agent.on_loss();
        agent.on_loss();
        assert!((agent.epsilon() - 0.1).abs() < 1e-9);

        agent.reset_policy();
        assert!((agent.epsilon() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_reset_policy_clears_table() {
        let mut agent = QLearningAgent::new(&params(RewardStrategy::Dense, 0.0)).with_seed(8);
        agent.decide(&ctx(1000, 0));
        agent.on_loss();
        assert!(agent.table_size() > 0);
        agent.reset_policy();
        assert_eq!(agent.table_size(), 0);
    }
}
