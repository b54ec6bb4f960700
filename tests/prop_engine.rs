//! Property-based tests for the engine.
//!
//! Random action sequences over random boards must keep the state
//! consistent no matter which actions are rejected along the way.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use cryptopoly::core::{
    Action, AssetConfig, AssetId, GameConfig, GameState, ManualClock, PlayerConfig, PlayerId,
    ScriptedDice, TurnPhase,
};
use cryptopoly::error::GameError;
use cryptopoly::rules::BoardGame;

// =============================================================================
// Strategies
// =============================================================================

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => Just(Action::Roll),
        2 => Just(Action::Step),
        3 => Just(Action::Advance),
        2 => Just(Action::Buy),
        1 => Just(Action::Pass),
        2 => Just(Action::PayRent),
        1 => Just(Action::EndTurn),
        1 => Just(Action::OpenCustomization),
        1 => Just(Action::CloseCustomization),
    ]
}

fn actions(max: usize) -> impl Strategy<Value = Vec<Action>> {
    proptest::collection::vec(action(), 0..max)
}

/// A board with assets on a subset of tiles and 1-6 seats.
fn config() -> impl Strategy<Value = GameConfig> {
    (4usize..24, 1usize..7, 0u64..2_000, any::<u64>()).prop_flat_map(
        |(board, seats, balance, seed)| {
            proptest::collection::btree_set(0..board, 0..board).prop_map(move |tiles| {
                let mut config = GameConfig::new(board)
                    .with_starting_balance(balance)
                    .with_seed(seed);
                for seat in 0..seats {
                    config = config.with_player(PlayerConfig::ai(format!("P{seat}")));
                }
                for (i, &tile) in tiles.iter().enumerate() {
                    let price = 50 + (i as u64 * 37) % 400;
                    let asset = AssetConfig::new(i as u16, format!("T{i}"), tile, price, price / 4);
                    config = config.with_asset(asset);
                }
                config
            })
        },
    )
}

fn game(config: &GameConfig) -> BoardGame {
    BoardGame::with_clock(config, ManualClock::new(0)).unwrap()
}

fn total_money(state: &GameState) -> u64 {
    state.players().iter().map(|p| p.balance).sum::<u64>() + state.prize_pot()
}

// =============================================================================
// Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Turn pointer, positions and two-way ownership survive any sequence.
    #[test]
    fn prop_invariants_hold(config in config(), actions in actions(200)) {
        let mut game = game(&config);
        for action in actions {
            let _ = game.apply(action);
            prop_assert_eq!(game.state().check_invariants(), Ok(()));
            prop_assert!(game.state().current_index() < game.state().player_count());
        }
    }

    /// Money only moves between players and the prize pot.
    #[test]
    fn prop_money_is_conserved(config in config(), actions in actions(200)) {
        let mut game = game(&config);
        let total = total_money(game.state());
        for action in actions {
            let _ = game.apply(action);
            prop_assert_eq!(total_money(game.state()), total);
        }
    }

    /// A rejected action leaves the state byte-for-byte unchanged.
    #[test]
    fn prop_rejection_is_a_no_op(config in config(), actions in actions(120)) {
        let mut game = game(&config);
        for action in actions {
            let before = game.state().to_bytes().unwrap();
            let logged = game.state().logs().total_written();
            if game.apply(action).is_err() {
                prop_assert_eq!(game.state().to_bytes().unwrap(), before);
                prop_assert_eq!(game.state().logs().total_written(), logged);
            }
        }
    }

    /// Only legal actions succeed.
    #[test]
    fn prop_legal_actions_are_accepted(
        config in config(),
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 0..100),
    ) {
        let mut game = game(&config);
        for pick in picks {
            let legal = game.legal_actions();
            if legal.is_empty() {
                break;
            }
            let action = legal[pick.index(legal.len())];
            prop_assert!(game.apply(action).is_ok(), "{:?} rejected", action);
        }
    }
}

// =============================================================================
// Movement
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// The path is the next `roll` tiles modulo the board size.
    #[test]
    fn prop_path_follows_board(board in 1usize..40, start in 0usize..40, roll in 1u8..=6) {
        let start = start % board;
        let config = GameConfig::new(board)
            .with_starting_position(start)
            .with_player(PlayerConfig::human("Solo"));
        let mut game = game(&config);

        let path = game.roll_dice_with(&mut ScriptedDice::new([roll])).unwrap().path;
        prop_assert_eq!(path.len(), roll as usize);
        for (i, &tile) in path.iter().enumerate() {
            prop_assert_eq!(tile, (start + i + 1) % board);
        }

        game.advance_along_path().unwrap();
        prop_assert_eq!(game.state().players()[0].position, *path.last().unwrap());
    }

    /// Rent moves exactly min(balance, rent) and reports the rest.
    #[test]
    fn prop_rent_is_capped(balance in 0u64..500, rent in 0u64..500) {
        let config = GameConfig::new(8)
            .with_player(PlayerConfig::human("Payer").with_balance(balance))
            .with_player(PlayerConfig::human("Owner").with_balance(0))
            .with_asset(AssetConfig::new(0, "ETH", 2, 100, rent));
        let mut game = game(&config);
        game.grant_asset(AssetId::new(0), PlayerId::new(1)).unwrap();
        game.roll_dice_with(&mut ScriptedDice::new([2])).unwrap();
        game.advance_along_path().unwrap();

        let payment = game.pay_rent().unwrap();
        prop_assert_eq!(payment.amount, balance.min(rent));
        prop_assert_eq!(payment.amount + payment.shortfall, rent);
        prop_assert_eq!(game.state().players()[0].balance, balance - payment.amount);
        prop_assert_eq!(game.state().players()[1].balance, payment.amount);
    }

    /// While a move or decision is pending, rolling is refused and the dice
    /// stream does not advance.
    #[test]
    fn prop_busy_guard(board in 4usize..20, roll in 1u8..=6, steps in 0usize..6) {
        let config = GameConfig::new(board)
            .with_player(PlayerConfig::human("A"))
            .with_player(PlayerConfig::human("B"))
            .with_asset(AssetConfig::new(0, "ETH", roll as usize % board, 10, 1));
        let mut game = game(&config);
        game.roll_dice_with(&mut ScriptedDice::new([roll])).unwrap();
        for _ in 0..steps.min(roll as usize - 1) {
            game.step().unwrap();
        }

        let before = game.state().to_bytes().unwrap();
        prop_assert_eq!(game.roll_dice(), Err(GameError::ActionInProgress));
        prop_assert_eq!(game.state().to_bytes().unwrap(), before);

        game.advance_along_path().unwrap();
        let awaiting_buy = matches!(game.state().phase(), TurnPhase::AwaitingBuy { .. });
        prop_assert!(awaiting_buy);
        prop_assert_eq!(game.roll_dice(), Err(GameError::ActionInProgress));
    }
}
