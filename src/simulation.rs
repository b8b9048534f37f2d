//! Turn engine
//!
//! A [`Simulation`] plays one game at a time to completion: every turn rolls
//! the die, moves the player, resolves the landed field and queues a
//! [`TurnOutcome`]. The game ends with a `Win` record once `max_turns` turns
//! have been played, or with a `Game Over` record on the first payment the
//! player cannot afford.

pub mod dice;
pub mod outcome;

use std::collections::VecDeque;

use log::debug;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

pub use dice::Dice;
pub use outcome::{EndGameStatus, TaggedOutcome, TurnEvent, TurnOutcome};

use crate::{
    Result,
    board::{Board, Field},
    config::{ChanceAction, SimulationConfig},
    player::{Bankruptcy, Player},
    q_learning::DecisionContext,
};

/// Where the state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running { turn: usize },
    Won,
    Bankrupt,
}

impl GameStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, GameStatus::Running { .. })
    }
}

/// Resolution of the landed field
enum Landing {
    Resolved {
        event: TurnEvent,
        description: String,
        amount: i64,
        extra_turns: usize,
    },
    Bankrupt {
        cause: Bankruptcy,
        description: String,
    },
}

/// One single-player game plus the state needed to replay it
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    board: Board,
    player: Player,
    dice: Dice,
    rng: StdRng,
    current_turn: usize,
    status: GameStatus,
    outcomes: VecDeque<TurnOutcome>,
}

impl Simulation {
    /// Create a simulation with a freshly generated board.
    ///
    /// The configuration seed, when present, drives the board layout, the
    /// chance draws and the dice.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: SimulationConfig, mut player: Player) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let board = Board::generate(&config, &mut rng)?;
        player.reset(config.start_cash);
        Ok(Self {
            config,
            board,
            player,
            dice: Dice::Random,
            rng,
            current_turn: 0,
            status: GameStatus::Running { turn: 0 },
            outcomes: VecDeque::new(),
        })
    }

    /// Create a simulation with the player type the configuration names.
    pub fn from_config(config: SimulationConfig) -> Result<Self> {
        let player = Player::from_type(
            config.player_type,
            config.start_cash,
            &config.qlearning,
            config.seed.map(|seed| seed.wrapping_add(1)),
        );
        Self::new(config, player)
    }

    /// Create a reproducible simulation.
    pub fn with_seed(config: SimulationConfig, player: Player, seed: u64) -> Result<Self> {
        Self::new(config.with_seed(seed), player)
    }

    pub fn with_dice(mut self, dice: Dice) -> Self {
        self.dice = dice;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    /// Records not yet drained, oldest first
    pub fn outcomes(&self) -> &VecDeque<TurnOutcome> {
        &self.outcomes
    }

    pub fn drain_outcomes(&mut self) -> Vec<TurnOutcome> {
        self.outcomes.drain(..).collect()
    }

    /// Play the current game to its end.
    ///
    /// Bankruptcy ends the game and is reported as an outcome, not as an
    /// error. Calling `run` on a finished game does nothing.
    ///
    /// # Errors
    ///
    /// Only an inconsistent board (a position outside it) fails.
    pub fn run(&mut self) -> Result<GameStatus> {
        while !self.status.is_finished() {
            if self.current_turn >= self.config.max_turns {
                self.finish_with_win();
                break;
            }
            self.play_turn()?;
        }
        Ok(self.status)
    }

    /// Start a new game on a new board. Undrained outcomes are kept and
    /// learned values survive.
    pub fn reset(&mut self) -> Result<()> {
        self.board = Board::generate(&self.config, &mut self.rng)?;
        self.player.reset(self.config.start_cash);
        self.dice.rewind();
        self.current_turn = 0;
        self.status = GameStatus::Running { turn: 0 };
        Ok(())
    }

    fn play_turn(&mut self) -> Result<()> {
        let turn = self.current_turn;
        let roll = self.dice.roll(self.config.die_faces, &mut self.rng);
        let (previous, position) = self.player.move_by(i64::from(roll), self.board.len());

        let mut notes = Vec::new();
        if previous > position {
            let bonus = self.config.start_passing_cash;
            self.player.receive(bonus);
            if bonus != 0 {
                notes.push(format!("Passed Start (+{bonus})"));
            }
        }
        debug!("turn {turn}: rolled {roll}, moved {previous} -> {position}");

        match self.resolve(position, turn)? {
            Landing::Resolved {
                event,
                description,
                amount,
                extra_turns,
            } => {
                notes.push(description);
                let outcome = self.snapshot(turn, event, notes.join("; "), amount, None);
                debug!(
                    "turn {turn}: {event} ({amount:+}), cash {}",
                    outcome.player_cash
                );
                self.outcomes.push_back(outcome);
                self.current_turn = (turn + 1 + extra_turns).min(self.config.max_turns);
                self.status = GameStatus::Running {
                    turn: self.current_turn,
                };
            }
            Landing::Bankrupt { cause, description } => {
                debug!("turn {turn}: {cause}");
                self.player.lose();
                notes.push(description);
                let outcome = self.snapshot(
                    turn,
                    TurnEvent::GameOver,
                    notes.join("; "),
                    -cause.amount,
                    Some(EndGameStatus::Bankruptcy),
                );
                self.outcomes.push_back(outcome);
                self.status = GameStatus::Bankrupt;
            }
        }
        Ok(())
    }

    fn resolve(&mut self, position: usize, turn: usize) -> Result<Landing> {
        let turns_left = self.config.max_turns.saturating_sub(turn);
        let landing = match self.board.field(position)? {
            Field::Start => {
                let bonus = self.config.start_landing_cash;
                if bonus != 0 {
                    self.player.receive(bonus);
                }
                Landing::Resolved {
                    event: TurnEvent::Start,
                    description: "Landed on Start".to_string(),
                    amount: bonus,
                    extra_turns: 0,
                }
            }
            Field::Empty => Landing::Resolved {
                event: TurnEvent::Empty,
                description: "Nothing happens".to_string(),
                amount: 0,
                extra_turns: 0,
            },
            Field::Tax { tax_amount } => {
                let tax = *tax_amount;
                match self.player.pay(tax) {
                    Ok(()) => Landing::Resolved {
                        event: TurnEvent::Tax,
                        description: format!("Paid tax of {tax}"),
                        amount: -tax,
                        extra_turns: 0,
                    },
                    Err(cause) => Landing::Bankrupt {
                        cause,
                        description: format!("Could not pay tax of {tax}"),
                    },
                }
            }
            Field::Chance(event) => {
                let (action, amount) = (event.action, event.amount);
                let description = event.description.clone();
                self.resolve_chance(action, amount, description)
            }
            Field::Property(property) if property.is_owned() => {
                let rent = property.rent;
                let name = property.name.clone();
                match self.player.pay(rent) {
                    Ok(()) => Landing::Resolved {
                        event: TurnEvent::RentPayment,
                        description: name,
                        amount: -rent,
                        extra_turns: 0,
                    },
                    Err(cause) => Landing::Bankrupt {
                        cause,
                        description: format!("Could not pay rent of {rent} for {name}"),
                    },
                }
            }
            Field::Property(property) => {
                let ctx = DecisionContext {
                    property_price: property.price,
                    cash: self.player.cash(),
                    turns_left,
                    properties_owned: self.player.properties().len(),
                };
                let (name, price) = (property.name.clone(), property.price);
                match self.player.buy_property(position, property, &ctx) {
                    Ok(true) => {
                        if let Some(property) = self.board.field_mut(position)?.as_property_mut() {
                            property.mark_owned();
                        }
                        Landing::Resolved {
                            event: TurnEvent::PropertyPurchase,
                            description: name,
                            amount: -price,
                            extra_turns: 0,
                        }
                    }
                    Ok(false) => Landing::Resolved {
                        event: TurnEvent::BuySkip,
                        description: name,
                        amount: 0,
                        extra_turns: 0,
                    },
                    Err(cause) => Landing::Bankrupt {
                        cause,
                        description: format!("Could not afford {name} for {price}"),
                    },
                }
            }
        };
        Ok(landing)
    }

    fn resolve_chance(&mut self, action: ChanceAction, amount: i64, description: String) -> Landing {
        match action {
            ChanceAction::Receive => {
                self.player.receive(amount);
                Landing::Resolved {
                    event: TurnEvent::Chance,
                    description,
                    amount,
                    extra_turns: 0,
                }
            }
            ChanceAction::Pay => match self.player.pay(amount) {
                Ok(()) => Landing::Resolved {
                    event: TurnEvent::Chance,
                    description,
                    amount: -amount,
                    extra_turns: 0,
                },
                Err(cause) => Landing::Bankrupt { cause, description },
            },
            ChanceAction::Move => {
                let (_, to) = self.player.move_by(amount, self.board.len());
                Landing::Resolved {
                    event: TurnEvent::Chance,
                    description: format!("{description} (now at {to})"),
                    amount: 0,
                    extra_turns: 0,
                }
            }
            ChanceAction::Skip => Landing::Resolved {
                event: TurnEvent::Chance,
                description,
                amount: 0,
                extra_turns: 1,
            },
        }
    }

    fn finish_with_win(&mut self) {
        self.player.win();
        let max_turns = self.config.max_turns;
        let outcome = self.snapshot(
            max_turns,
            TurnEvent::Win,
            format!("Survived {max_turns} turns"),
            0,
            Some(EndGameStatus::Win),
        );
        debug!("game won with {} in cash", outcome.player_cash);
        self.outcomes.push_back(outcome);
        self.status = GameStatus::Won;
    }

    fn snapshot(
        &self,
        turn: usize,
        event: TurnEvent,
        description: String,
        amount: i64,
        end_game_status: Option<EndGameStatus>,
    ) -> TurnOutcome {
        TurnOutcome {
            turn,
            player_position: self.player.position(),
            player_cash: self.player.cash(),
            properties_owned: self.player.properties().len(),
            event,
            description,
            amount,
            end_game_status,
        }
    }
}
