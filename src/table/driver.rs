//! Turn driver for headless matches.

use serde::{Deserialize, Serialize};

use crate::core::{
    Action, Event, GameConfig, GameResult, GameStatus, ManualClock, PlayerId, TileAction, TurnPhase,
};
use crate::error::{ConfigError, EngineResult};
use crate::rules::{BoardGame, DecisionPolicy, ThresholdPolicy};

/// Why `play_turn` returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStop {
    /// The turn ran to completion and passed to the next seat.
    Completed,
    /// A human seat owes this decision.
    AwaitingHuman(TileAction),
    /// The game is over.
    Finished,
}

/// Events of one driven turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Seat that acted.
    pub player: PlayerId,
    /// Everything that happened, in order.
    pub events: Vec<Event>,
    /// Why the driver stopped.
    pub stop: TurnStop,
}

/// Outcome of `Table::run`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Turns completed.
    pub turns_played: u32,
    /// Why the run ended.
    pub stop: TurnStop,
    /// Leaders by net worth at the end of the run.
    pub result: GameResult,
    /// Net worth per seat, in turn order.
    pub net_worth: Vec<u64>,
}

/// Plays turns for a game: rolls, walks the path and applies the policy
/// for AI seats. Human seats are rolled for but stop the driver at their
/// decisions.
///
/// ## Example
///
/// ```
/// use cryptopoly::core::{GameConfig, PlayerConfig};
/// use cryptopoly::table::{Table, TurnStop};
///
/// let config = GameConfig::classic().with_max_turns(40);
/// let all_ai = GameConfig {
///     players: config.players.iter().map(|p| PlayerConfig { is_ai: true, ..p.clone() }).collect(),
///     ..config
/// };
///
/// let mut table = Table::new(&all_ai).unwrap();
/// let summary = table.run(100).unwrap();
/// assert_eq!(summary.stop, TurnStop::Finished);
/// ```
#[derive(Debug)]
pub struct Table<P: DecisionPolicy = ThresholdPolicy> {
    game: BoardGame,
    policy: P,
}

impl Table<ThresholdPolicy> {
    /// Seat a new game with the default policy and a manual clock.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_policy(
            BoardGame::with_clock(config, ManualClock::default())?,
            ThresholdPolicy::default(),
        ))
    }
}

impl<P: DecisionPolicy> Table<P> {
    /// Drive an existing game with a custom policy.
    pub fn with_policy(game: BoardGame, policy: P) -> Self {
        Self { game, policy }
    }

    /// The game being driven.
    #[must_use]
    pub fn game(&self) -> &BoardGame {
        &self.game
    }

    /// Mutable access, e.g. to answer a human decision.
    pub fn game_mut(&mut self) -> &mut BoardGame {
        &mut self.game
    }

    /// Give up the driver and keep the game.
    #[must_use]
    pub fn into_game(self) -> BoardGame {
        self.game
    }

    /// Drive the current seat's turn as far as possible.
    pub fn play_turn(&mut self) -> EngineResult<TurnReport> {
        let player = self.game.state().current_player().id;
        let mut events = Vec::new();

        if self.game.state().status() == GameStatus::Finished {
            return Ok(TurnReport {
                player,
                events,
                stop: TurnStop::Finished,
            });
        }

        if self.game.state().is_customizing() {
            events.extend(self.game.apply(Action::CloseCustomization)?);
        }
        if self.game.state().phase().is_idle() {
            events.extend(self.game.apply(Action::Roll)?);
        }
        if self.game.state().phase().is_moving() {
            events.extend(self.game.apply(Action::Advance)?);
        }

        if let Some(tile) = self.game.pending_decision() {
            match self.game.auto_decide(&self.policy)? {
                Some(decided) => events.extend(decided),
                None if !self.game.state().current_player().is_ai => {
                    return Ok(TurnReport {
                        player,
                        events,
                        stop: TurnStop::AwaitingHuman(tile),
                    });
                }
                None => events.extend(self.game.apply(Action::EndTurn)?),
            }
        }

        let stop = if self.game.state().status() == GameStatus::Finished {
            TurnStop::Finished
        } else {
            TurnStop::Completed
        };
        Ok(TurnReport { player, events, stop })
    }

    /// Play up to `max_turns` turns, stopping early at a human decision or
    /// the end of the game.
    pub fn run(&mut self, max_turns: u32) -> EngineResult<MatchSummary> {
        let mut turns_played = 0;
        let mut stop = TurnStop::Completed;

        while turns_played < max_turns {
            let report = self.play_turn()?;
            stop = report.stop;
            if stop != TurnStop::Completed {
                break;
            }
            turns_played += 1;
        }

        tracing::info!(turns_played, ?stop, "match run ended");

        let state = self.game.state();
        Ok(MatchSummary {
            turns_played,
            stop,
            result: state.standings(),
            net_worth: state.players().iter().map(|p| state.net_worth(p.id)).collect(),
        })
    }

    /// Whether the driver would stop for a human decision right now.
    #[must_use]
    pub fn awaiting_human(&self) -> bool {
        let state = self.game.state();
        !state.current_player().is_ai
            && matches!(
                state.phase(),
                TurnPhase::AwaitingBuy { .. } | TurnPhase::AwaitingPay { .. }
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssetConfig, AssetId, PlayerConfig, ScriptedDice};
    use crate::rules::GreedyPolicy;

    fn all_ai(seed: u64) -> GameConfig {
        let mut config = GameConfig::classic().with_seed(seed).with_max_turns(60);
        for seat in &mut config.players {
            seat.is_ai = true;
        }
        config
    }

    #[test]
    fn test_ai_match_runs_to_finish() {
        let mut table = Table::new(&all_ai(3)).unwrap();
        let summary = table.run(1_000).unwrap();

        assert_eq!(summary.stop, TurnStop::Finished);
        assert_eq!(summary.turns_played, 59);
        assert_eq!(summary.net_worth.len(), 4);
        assert_eq!(table.game().state().check_invariants(), Ok(()));
    }

    #[test]
    fn test_human_seat_stops_driver() {
        let config = GameConfig::new(8)
            .with_player(PlayerConfig::human("Alice"))
            .with_player(PlayerConfig::ai("Bot"))
            .with_asset(AssetConfig::new(0, "ETH", 3, 200, 50));
        let mut game = BoardGame::new(&config).unwrap();
        game.roll_dice_with(&mut ScriptedDice::new([3])).unwrap();

        let mut table = Table::with_policy(game, ThresholdPolicy::default());
        let report = table.play_turn().unwrap();

        assert_eq!(report.stop, TurnStop::AwaitingHuman(TileAction::OfferBuy(AssetId::new(0))));
        assert!(table.awaiting_human());

        // Stays put until the human answers.
        let again = table.play_turn().unwrap();
        assert!(again.events.is_empty());

        table.game_mut().pass().unwrap();
        assert!(!table.awaiting_human());
        assert_eq!(table.game().state().current_index(), 1);
    }

    #[test]
    fn test_same_seed_same_match() {
        let a = Table::new(&all_ai(11)).unwrap().run(200).unwrap();
        let b = Table::new(&all_ai(11)).unwrap().run(200).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_policy() {
        let game = BoardGame::new(&all_ai(5)).unwrap();
        let mut table = Table::with_policy(game, GreedyPolicy);
        let summary = table.run(30).unwrap();

        assert_eq!(summary.turns_played, 30);
        assert_eq!(table.game().state().check_invariants(), Ok(()));
    }

    #[test]
    fn test_finished_game_reports_finished() {
        let mut table = Table::new(&all_ai(1)).unwrap();
        table.game_mut().finish().unwrap();

        let report = table.play_turn().unwrap();
        assert_eq!(report.stop, TurnStop::Finished);
        assert!(report.events.is_empty());
    }
}
