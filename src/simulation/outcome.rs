//! Turn outcome records
//!
//! One record per played turn plus exactly one terminal record per game.
//! Labels serialize verbatim, since downstream reports match on them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What happened on a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TurnEvent {
    Start,
    Tax,
    Chance,
    #[serde(rename = "Property Purchase")]
    PropertyPurchase,
    #[serde(rename = "Buy Skip")]
    BuySkip,
    #[serde(rename = "Rent Payment")]
    RentPayment,
    Empty,
    #[serde(rename = "Game Over")]
    GameOver,
    Win,
}

impl TurnEvent {
    pub fn label(&self) -> &'static str {
        match self {
            TurnEvent::Start => "Start",
            TurnEvent::Tax => "Tax",
            TurnEvent::Chance => "Chance",
            TurnEvent::PropertyPurchase => "Property Purchase",
            TurnEvent::BuySkip => "Buy Skip",
            TurnEvent::RentPayment => "Rent Payment",
            TurnEvent::Empty => "Empty",
            TurnEvent::GameOver => "Game Over",
            TurnEvent::Win => "Win",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnEvent::GameOver | TurnEvent::Win)
    }
}

impl fmt::Display for TurnEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndGameStatus {
    Win,
    #[serde(rename = "Bankrupcy")]
    Bankruptcy,
}

impl EndGameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EndGameStatus::Win => "Win",
            EndGameStatus::Bankruptcy => "Bankrupcy",
        }
    }
}

impl fmt::Display for EndGameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of one turn, taken after the landed field was resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub turn: usize,
    pub player_position: usize,
    pub player_cash: i64,
    pub properties_owned: usize,
    pub event: TurnEvent,
    pub description: String,
    /// Signed cash effect of the landed field
    pub amount: i64,
    pub end_game_status: Option<EndGameStatus>,
}

impl TurnOutcome {
    pub fn is_terminal(&self) -> bool {
        self.end_game_status.is_some()
    }

    /// Last `"; "`-separated segment of the description. For property
    /// events this is the property name.
    pub fn subject(&self) -> &str {
        self.description
            .rsplit("; ")
            .next()
            .unwrap_or(&self.description)
    }
}

/// A turn outcome labelled with the simulation and game it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedOutcome {
    pub simulation_title: String,
    pub game_no: usize,
    #[serde(flatten)]
    pub outcome: TurnOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_serialize_verbatim() {
        let outcome = TurnOutcome {
            turn: 7,
            player_position: 3,
            player_cash: 40,
            properties_owned: 2,
            event: TurnEvent::GameOver,
            description: "Could not pay rent for Amber Avenue".to_string(),
            amount: -60,
            end_game_status: Some(EndGameStatus::Bankruptcy),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["event"], "Game Over");
        assert_eq!(json["end_game_status"], "Bankrupcy");

        let tagged = TaggedOutcome {
            simulation_title: "Player: Always Buy".to_string(),
            game_no: 1,
            outcome,
        };
        let json = serde_json::to_value(&tagged).unwrap();
        assert_eq!(json["game_no"], 1);
        assert_eq!(json["turn"], 7);
        assert_eq!(
            serde_json::to_value(TurnEvent::PropertyPurchase).unwrap(),
            "Property Purchase"
        );
    }
}
