//! Properties of the board, the player and the turn engine over many seeds

mod common;

use common::{harsh_config, short_config};
use monopoly_sim::{
    Bankruptcy, Board, Dice, EndGameStatus, Field, FieldKind, GameStatus, Player, PlayerType,
    Simulation, SimulationConfig, TurnEvent,
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn test_move_wraps_modulo_board_size() {
    for board_size in 1..=24usize {
        for steps in -30i64..=30 {
            for start in 0..board_size as i64 {
                let mut player = Player::never_buy(100);
                player.move_by(start, board_size);
                let (previous, position) = player.move_by(steps, board_size);
                assert_eq!(previous, start as usize);
                assert!(position < board_size);
                assert_eq!(
                    position as i64,
                    (start + steps).rem_euclid(board_size as i64)
                );
            }
        }
    }
}

#[test]
fn test_pay_never_overdraws() {
    for cash in [0i64, 1, 99, 100, 500] {
        for amount in [0i64, 1, 100, 101, 500] {
            let mut player = Player::always_buy(cash);
            let result = player.pay(amount);
            if amount > cash {
                assert_eq!(result, Err(Bankruptcy { amount, cash }));
                assert_eq!(player.cash(), cash);
            } else {
                assert_eq!(result, Ok(()));
                assert_eq!(player.cash(), cash - amount);
            }
        }
    }
}

#[test]
fn test_bankruptcy_on_large_payment_keeps_cash() {
    let mut player = Player::always_buy(100);
    let err = player.pay(500).unwrap_err();
    assert_eq!(err.amount, 500);
    assert_eq!(player.cash(), 100);
}

#[test]
fn test_board_composition_is_independent_of_seed() {
    let config = SimulationConfig::default();
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::generate(&config, &mut rng).unwrap();
        assert_eq!(board.field(0).unwrap(), &Field::Start);
        assert_eq!(board.count(FieldKind::Start), 1);
        assert_eq!(board.count(FieldKind::Tax), config.tax_fields);
        assert_eq!(board.count(FieldKind::Chance), config.chance_fields);
        assert_eq!(board.count(FieldKind::Property), config.property_fields);
    }
}

#[test]
fn test_every_game_has_exactly_one_terminal_record() {
    for player_type in PlayerType::ALL {
        for seed in 0..25 {
            let config = harsh_config(player_type).with_seed(seed);
            let max_turns = config.max_turns;
            let mut sim = Simulation::from_config(config).unwrap();
            let status = sim.run().unwrap();
            let outcomes = sim.drain_outcomes();

            let terminal: Vec<_> = outcomes.iter().filter(|o| o.is_terminal()).collect();
            assert_eq!(terminal.len(), 1);
            assert!(outcomes.last().unwrap().is_terminal());
            assert!(outcomes.len() - 1 <= max_turns);

            match status {
                GameStatus::Won => {
                    assert_eq!(terminal[0].end_game_status, Some(EndGameStatus::Win));
                    assert_eq!(terminal[0].turn, max_turns);
                }
                GameStatus::Bankrupt => {
                    assert_eq!(
                        terminal[0].end_game_status,
                        Some(EndGameStatus::Bankruptcy)
                    );
                    assert_eq!(terminal[0].event, TurnEvent::GameOver);
                    assert!(terminal[0].amount < 0);
                }
                GameStatus::Running { .. } => panic!("game did not finish"),
            }

            // Turns are strictly increasing
            assert!(outcomes.windows(2).all(|w| w[0].turn < w[1].turn));
        }
    }
}

#[test]
fn test_harsh_board_produces_bankruptcies() {
    let bankrupt = (0..25)
        .filter(|&seed| {
            let config = harsh_config(PlayerType::AlwaysBuy).with_seed(seed);
            let mut sim = Simulation::from_config(config).unwrap();
            sim.run().unwrap() == GameStatus::Bankrupt
        })
        .count();
    assert!(bankrupt > 0);
}

#[test]
fn test_always_buy_buys_what_it_lands_on() {
    for seed in 0..20 {
        let config = short_config(PlayerType::AlwaysBuy, 80).with_seed(seed);
        let mut sim = Simulation::from_config(config).unwrap();
        sim.run().unwrap();

        let outcomes = sim.drain_outcomes();
        assert!(outcomes.iter().all(|o| o.event != TurnEvent::BuySkip));

        let purchases = outcomes
            .iter()
            .filter(|o| o.event == TurnEvent::PropertyPurchase)
            .count();
        assert_eq!(purchases, sim.player().properties().len());
        assert_eq!(purchases, sim.board().owned_properties().count());
        for deed in sim.player().properties() {
            let property = sim.board().field(deed.position).unwrap().as_property().unwrap();
            assert!(property.is_owned());
            assert_eq!(property.name, deed.name);
        }
    }
}

#[test]
fn test_never_buy_never_purchases() {
    for seed in 0..20 {
        let config = short_config(PlayerType::NeverBuy, 80).with_seed(seed);
        let mut sim = Simulation::from_config(config).unwrap();
        sim.run().unwrap();
        let outcomes = sim.drain_outcomes();
        assert!(
            outcomes
                .iter()
                .all(|o| o.event != TurnEvent::PropertyPurchase && o.event != TurnEvent::RentPayment)
        );
        assert_eq!(sim.board().owned_properties().count(), 0);
    }
}

#[test]
fn test_single_tax_field_scenario() {
    let config = SimulationConfig {
        board_size: 4,
        die_faces: 1,
        tax_fields: 1,
        tax_amount: 50,
        property_fields: 0,
        chance_fields: 0,
        start_cash: 200,
        max_turns: 1,
        ..SimulationConfig::default()
    };
    let mut sim = (0..100)
        .map(|seed| Simulation::with_seed(config.clone(), Player::always_buy(200), seed).unwrap())
        .find(|sim| sim.board().field(1).unwrap().kind() == FieldKind::Tax)
        .unwrap();

    sim.run().unwrap();
    let outcome = &sim.outcomes()[0];
    assert_eq!(outcome.player_position, 1);
    assert_eq!(outcome.player_cash, 150);
    assert_eq!(outcome.event, TurnEvent::Tax);
    assert_eq!(outcome.amount, -50);
}

#[test]
fn test_bankruptcy_ends_the_game_with_the_reported_status() {
    let config = SimulationConfig {
        board_size: 3,
        die_faces: 1,
        tax_fields: 2,
        tax_amount: 500,
        property_fields: 0,
        chance_fields: 0,
        start_cash: 100,
        max_turns: 50,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::with_seed(config, Player::always_buy(100), 1).unwrap();
    assert_eq!(sim.run().unwrap(), GameStatus::Bankrupt);

    let outcomes = sim.drain_outcomes();
    assert_eq!(outcomes.len(), 1);
    let json = serde_json::to_value(&outcomes[0]).unwrap();
    assert_eq!(json["end_game_status"], "Bankrupcy");
    assert_eq!(json["event"], "Game Over");
    assert_eq!(json["player_cash"], 100);

    assert_eq!(sim.run().unwrap(), GameStatus::Bankrupt);
    assert!(sim.outcomes().is_empty());
}

#[test]
fn test_landing_on_start_pays_configured_bonus() {
    let config = SimulationConfig {
        board_size: 2,
        die_faces: 2,
        tax_fields: 0,
        chance_fields: 0,
        property_fields: 0,
        start_passing_cash: 0,
        start_landing_cash: 300,
        start_cash: 1000,
        max_turns: 1,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::with_seed(config, Player::never_buy(1000), 3)
        .unwrap()
        .with_dice(Dice::scripted(vec![2]));
    sim.run().unwrap();
    let outcome = &sim.outcomes()[0];
    assert_eq!(outcome.event, TurnEvent::Start);
    assert_eq!(outcome.amount, 300);
    assert_eq!(outcome.player_cash, 1300);
}

#[test]
fn test_same_seed_replays_the_same_game() {
    let config = harsh_config(PlayerType::AlwaysBuy).with_seed(42);
    let mut first = Simulation::from_config(config.clone()).unwrap();
    let mut second = Simulation::from_config(config).unwrap();
    first.run().unwrap();
    second.run().unwrap();
    assert_eq!(first.board(), second.board());
    assert_eq!(first.drain_outcomes(), second.drain_outcomes());
}
