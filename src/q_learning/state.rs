//! State and action space of the purchase decision

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The two choices available at every decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Buy,
    Skip,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Buy, Action::Skip];

    pub fn label(&self) -> &'static str {
        match self {
            Action::Buy => "buy",
            Action::Skip => "skip",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the agent may look at when deciding on a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecisionContext {
    pub property_price: i64,
    pub cash: i64,
    pub turns_left: usize,
    pub properties_owned: usize,
}

/// Which tuple the agent uses as its state key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateEncoding {
    /// `(cash_bucket, properties_owned)`
    Compact,
    /// `(property_price, cash_bucket, turns_left_bucket, properties_owned)`
    #[default]
    Rich,
}

impl FromStr for StateEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(StateEncoding::Compact),
            "rich" => Ok(StateEncoding::Rich),
            other => Err(Error::invalid_config(format!(
                "unknown state encoding '{other}' (expected 'compact' or 'rich')"
            ))),
        }
    }
}

/// Hashable value-type key of the Q-table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateKey {
    Compact {
        cash_bucket: i64,
        properties_owned: usize,
    },
    Rich {
        property_price: i64,
        cash_bucket: i64,
        turns_left_bucket: usize,
        properties_owned: usize,
    },
}

/// Maps decision contexts onto state keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEncoder {
    encoding: StateEncoding,
    cash_bucket: i64,
    turns_bucket: usize,
}

impl StateEncoder {
    /// Bucket widths below 1 are raised to 1 (raw values).
    pub fn new(encoding: StateEncoding, cash_bucket: i64, turns_bucket: usize) -> Self {
        Self {
            encoding,
            cash_bucket: cash_bucket.max(1),
            turns_bucket: turns_bucket.max(1),
        }
    }

    pub fn encoding(&self) -> StateEncoding {
        self.encoding
    }

    pub fn encode(&self, ctx: &DecisionContext) -> StateKey {
        let cash_bucket = ctx.cash.div_euclid(self.cash_bucket);
        match self.encoding {
            StateEncoding::Compact => StateKey::Compact {
                cash_bucket,
                properties_owned: ctx.properties_owned,
            },
            StateEncoding::Rich => StateKey::Rich {
                property_price: ctx.property_price,
                cash_bucket,
                turns_left_bucket: ctx.turns_left / self.turns_bucket,
                properties_owned: ctx.properties_owned,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(cash: i64, turns_left: usize) -> DecisionContext {
        DecisionContext {
            property_price: 120,
            cash,
            turns_left,
            properties_owned: 2,
        }
    }

    #[test]
    fn test_compact_key_ignores_price_and_turns() {
        let encoder = StateEncoder::new(StateEncoding::Compact, 100, 25);
        let a = encoder.encode(&ctx(1050, 10));
        let b = encoder.encode(&DecisionContext {
            property_price: 300,
            ..ctx(1099, 200)
        });
        assert_eq!(a, b);
        assert_eq!(
            a,
            StateKey::Compact {
                cash_bucket: 10,
                properties_owned: 2
            }
        );
    }

    #[test]
    fn test_rich_key_buckets() {
        let encoder = StateEncoder::new(StateEncoding::Rich, 100, 25);
        assert_eq!(
            encoder.encode(&ctx(999, 74)),
            StateKey::Rich {
                property_price: 120,
                cash_bucket: 9,
                turns_left_bucket: 2,
                properties_owned: 2
            }
        );
    }

    #[test]
    fn test_negative_cash_rounds_down() {
        let encoder = StateEncoder::new(StateEncoding::Compact, 100, 1);
        assert_eq!(
            encoder.encode(&ctx(-1, 0)),
            StateKey::Compact {
                cash_bucket: -1,
                properties_owned: 2
            }
        );
    }

    #[test]
    fn test_zero_bucket_means_raw_values() {
        let encoder = StateEncoder::new(StateEncoding::Rich, 0, 0);
        assert_eq!(
            encoder.encode(&ctx(1234, 17)),
            StateKey::Rich {
                property_price: 120,
                cash_bucket: 1234,
                turns_left_bucket: 17,
                properties_owned: 2
            }
        );
    }
}
