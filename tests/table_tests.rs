//! Headless driver tests.
//!
//! All-AI and mixed tables played through `Table`.

use cryptopoly::core::{Event, GameConfig, GameResult, GameStatus, PlayerConfig, TileAction};
use cryptopoly::rules::{BoardGame, DecisionPolicy, ThresholdPolicy};
use cryptopoly::table::{Table, TurnStop};

fn all_ai(seed: u64, max_turns: u32) -> GameConfig {
    let mut config = GameConfig::classic().with_seed(seed).with_max_turns(max_turns);
    for seat in &mut config.players {
        seat.is_ai = true;
    }
    config
}

// =============================================================================
// All-AI matches
// =============================================================================

#[test]
fn test_many_seeds_finish_cleanly() {
    for seed in 0..20 {
        let mut table = Table::new(&all_ai(seed, 120)).unwrap();
        let summary = table.run(10_000).unwrap();

        assert_eq!(summary.stop, TurnStop::Finished, "seed {seed}");
        let state = table.game().state();
        assert_eq!(state.status(), GameStatus::Finished);
        assert_eq!(state.check_invariants(), Ok(()));
        assert_eq!(summary.result, state.standings());
    }
}

#[test]
fn test_summary_serializes() {
    let summary = Table::new(&all_ai(8, 40)).unwrap().run(100).unwrap();
    let json = serde_json::to_string(&summary).unwrap();
    let back: cryptopoly::table::MatchSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back, summary);
}

#[test]
fn test_winner_has_highest_net_worth() {
    let summary = Table::new(&all_ai(21, 80)).unwrap().run(1_000).unwrap();
    let best = *summary.net_worth.iter().max().unwrap();

    match summary.result {
        GameResult::Winner(p) => assert_eq!(summary.net_worth[p.index()], best),
        GameResult::Winners(ps) => {
            assert!(ps.len() > 1);
            assert!(ps.iter().all(|p| summary.net_worth[p.index()] == best));
        }
    }
}

#[test]
fn test_each_report_belongs_to_one_seat() {
    let mut table = Table::new(&all_ai(4, 50)).unwrap();
    for _ in 0..20 {
        let report = table.play_turn().unwrap();
        if report.stop == TurnStop::Finished {
            break;
        }
        assert!(matches!(
            report.events.first(),
            Some(Event::Rolled { player, .. }) if *player == report.player
        ));
        assert!(matches!(
            report.events.last(),
            Some(Event::TurnAdvanced { from, .. }) if *from == report.player
        ));
    }
}

// =============================================================================
// Mixed tables
// =============================================================================

#[test]
fn test_classic_table_waits_for_human() {
    let mut table = Table::new(&GameConfig::classic().with_seed(2)).unwrap();

    // Drive until the human owes a decision.
    let mut waiting = None;
    for _ in 0..200 {
        let report = table.play_turn().unwrap();
        if let TurnStop::AwaitingHuman(tile) = report.stop {
            waiting = Some(tile);
            break;
        }
    }
    let tile = waiting.expect("human never owed a decision");
    assert!(tile.requires_decision());
    assert!(table.awaiting_human());
    assert_eq!(table.game().state().current_index(), 0);

    match tile {
        TileAction::OfferBuy(_) => table.game_mut().pass().map(drop).unwrap(),
        TileAction::OfferPay { .. } => table.game_mut().pay_rent().map(drop).unwrap(),
        TileAction::None => unreachable!(),
    }
    assert_eq!(table.game().state().current_index(), 1);
}

/// Never buys.
struct Frugal;

impl DecisionPolicy for Frugal {
    fn decide(&self, state: &cryptopoly::core::GameState) -> Option<cryptopoly::core::Decision> {
        ThresholdPolicy::with_margin(u64::MAX, 1).decide(state)
    }
}

#[test]
fn test_frugal_policy_buys_nothing() {
    let game = BoardGame::new(&all_ai(6, 60)).unwrap();
    let mut table = Table::with_policy(game, Frugal);
    table.run(1_000).unwrap();

    let state = table.game().state();
    assert!(state.assets().iter().all(|a| a.is_unowned()));
    assert_eq!(state.prize_pot(), 0);
    assert!(state.players().iter().all(|p| p.balance == 1000));
}
