//! Automatic decision policies for AI seats.
//!
//! A policy is a pure function of the state: it says what to do at a
//! pending tile decision and nothing else. When it runs (after an
//! animation settles, on a timer, immediately in a headless match) is up
//! to the caller.

use crate::core::{BuyMargin, Decision, GameState, TurnPhase};

/// Chooses a decision for the current player.
pub trait DecisionPolicy: Send + Sync {
    /// Decide what to do at the pending tile decision.
    ///
    /// Returns `None` when no decision is pending.
    fn decide(&self, state: &GameState) -> Option<Decision>;
}

/// Buys when the balance clears the price by a margin, otherwise passes.
/// Always pays rent.
///
/// Uses the game's configured `BuyMargin` (default 1.2) unless overridden.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThresholdPolicy {
    margin: Option<BuyMargin>,
}

impl ThresholdPolicy {
    /// Use a fixed margin instead of the game's.
    #[must_use]
    pub fn with_margin(numerator: u64, denominator: u64) -> Self {
        Self {
            margin: Some(BuyMargin {
                numerator,
                denominator,
            }),
        }
    }
}

impl DecisionPolicy for ThresholdPolicy {
    fn decide(&self, state: &GameState) -> Option<Decision> {
        match state.phase() {
            TurnPhase::AwaitingBuy { asset } => {
                let price = state.asset(*asset)?.price;
                let margin = self.margin.unwrap_or_else(|| state.buy_margin());
                if margin.denominator > 0 && margin.allows(state.current_player().balance, price) {
                    Some(Decision::Buy)
                } else {
                    Some(Decision::Pass)
                }
            }
            TurnPhase::AwaitingPay { .. } => Some(Decision::PayRent),
            TurnPhase::Idle | TurnPhase::Moving { .. } => None,
        }
    }
}

/// Buys anything it can afford.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl DecisionPolicy for GreedyPolicy {
    fn decide(&self, state: &GameState) -> Option<Decision> {
        match state.phase() {
            TurnPhase::AwaitingBuy { asset } => {
                let price = state.asset(*asset)?.price;
                if state.current_player().balance >= price {
                    Some(Decision::Buy)
                } else {
                    Some(Decision::Pass)
                }
            }
            TurnPhase::AwaitingPay { .. } => Some(Decision::PayRent),
            TurnPhase::Idle | TurnPhase::Moving { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssetConfig, AssetId, GameConfig, PlayerConfig, PlayerId, ScriptedDice};
    use crate::rules::BoardGame;

    fn landed_on_asset(balance: u64, owner: Option<PlayerId>) -> BoardGame {
        let config = GameConfig::new(8)
            .with_player(PlayerConfig::ai("Bot").with_balance(balance))
            .with_player(PlayerConfig::ai("Other"))
            .with_asset(AssetConfig::new(0, "ETH", 3, 200, 50));
        let mut game = BoardGame::new(&config).unwrap();
        if let Some(owner) = owner {
            game.grant_asset(AssetId::new(0), owner).unwrap();
        }
        game.roll_dice_with(&mut ScriptedDice::new([3])).unwrap();
        game.advance_along_path().unwrap();
        game
    }

    #[test]
    fn test_threshold_buys_above_margin() {
        let game = landed_on_asset(241, None);
        assert_eq!(ThresholdPolicy::default().decide(game.state()), Some(Decision::Buy));
    }

    #[test]
    fn test_threshold_passes_at_margin() {
        // 240 == 200 * 1.2, not strictly greater.
        let game = landed_on_asset(240, None);
        assert_eq!(ThresholdPolicy::default().decide(game.state()), Some(Decision::Pass));
    }

    #[test]
    fn test_threshold_pays_rent() {
        let game = landed_on_asset(10, Some(PlayerId::new(1)));
        assert_eq!(ThresholdPolicy::default().decide(game.state()), Some(Decision::PayRent));
    }

    #[test]
    fn test_threshold_custom_margin() {
        let game = landed_on_asset(300, None);
        assert_eq!(ThresholdPolicy::with_margin(2, 1).decide(game.state()), Some(Decision::Pass));
        assert_eq!(ThresholdPolicy::with_margin(1, 1).decide(game.state()), Some(Decision::Buy));
    }

    #[test]
    fn test_no_decision_when_idle() {
        let config = GameConfig::classic();
        let game = BoardGame::new(&config).unwrap();
        assert_eq!(ThresholdPolicy::default().decide(game.state()), None);
        assert_eq!(GreedyPolicy.decide(game.state()), None);
    }

    #[test]
    fn test_greedy_buys_when_affordable() {
        let game = landed_on_asset(200, None);
        assert_eq!(GreedyPolicy.decide(game.state()), Some(Decision::Buy));

        let game = landed_on_asset(199, None);
        assert_eq!(GreedyPolicy.decide(game.state()), Some(Decision::Pass));
    }
}
