//! Tabular Q-learning for purchase decisions
//!
//! The learning player faces one decision type: whether to buy the unowned
//! property it just landed on. Each decision is keyed by a [`StateKey`] built
//! from the decision context (never from the property's identity, so values
//! generalize across properties with similar price and cash context) and one
//! of the two [`Action`]s.
//!
//! ## Update rule
//!
//! One-step Q-learning, applied online right after each decision:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α · (r + γ · max_a' Q(s',a') − Q(s,a))
//! ```
//!
//! Terminal updates (win, loss, failed purchase) drop the bootstrap term.
//!
//! ## Reward shaping
//!
//! | Strategy | Buy / skip | Win | Loss |
//! |----------|------------|-----|------|
//! | sparse   | none       | yes | yes  |
//! | dense    | yes        | no  | yes  |
//! | mixed    | yes        | yes | yes  |
//!
//! ## Usage Example
//!
//! ```
//! use monopoly_sim::config::QLearningParams;
//! use monopoly_sim::q_learning::{Action, DecisionContext, QLearningAgent};
//!
//! let mut agent = QLearningAgent::new(&QLearningParams::default()).with_seed(3);
//! let ctx = DecisionContext {
//!     property_price: 100,
//!     cash: 1500,
//!     turns_left: 200,
//!     properties_owned: 0,
//! };
//! let action = agent.decide(&ctx);
//! assert!(Action::ALL.contains(&action));
//! ```

pub mod agent;
pub mod q_table;
pub mod reward;
pub mod state;

pub use agent::QLearningAgent;
pub use q_table::QTable;
pub use reward::{RewardStrategy, RewardValues};
pub use state::{Action, DecisionContext, StateEncoder, StateEncoding, StateKey};
