//! Actions (what callers ask for) and events (what happened).
//!
//! The engine is driven message-style: an `Action` goes in, a list of
//! `Event`s comes out. The presentation layer maps its own signals onto
//! actions ("dice settled" is `Action::Step`, "movement finished" is
//! `Action::Advance`) and animates the returned events.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::asset::AssetId;
use super::player::PlayerId;

/// Tiles walked by one roll, in order. A roll never exceeds six tiles.
pub type TilePath = SmallVec<[usize; 6]>;

/// A request to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Roll the dice for the current player.
    Roll,
    /// Move the current player one tile along the rolled path.
    Step,
    /// Walk the rest of the rolled path.
    Advance,
    /// Buy the asset on offer.
    Buy,
    /// Decline the asset on offer.
    Pass,
    /// Pay rent to the owner of the current tile.
    PayRent,
    /// Hand the turn to the next player.
    EndTurn,
    /// Open the customization overlay.
    OpenCustomization,
    /// Close the customization overlay.
    CloseCustomization,
    /// End the game and compute standings.
    Finish,
}

/// A choice at a pending tile decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Buy the asset on offer.
    Buy,
    /// Decline the asset on offer.
    Pass,
    /// Pay rent on another player's asset.
    PayRent,
}

impl From<Decision> for Action {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Buy => Action::Buy,
            Decision::Pass => Action::Pass,
            Decision::PayRent => Action::PayRent,
        }
    }
}

/// What landing on a tile requires of the current player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileAction {
    /// Nothing to decide: empty tile or own asset.
    None,
    /// Unowned asset: buy or pass.
    OfferBuy(AssetId),
    /// Asset owned by another player: pay rent.
    OfferPay {
        /// The asset.
        asset: AssetId,
        /// Its owner.
        owner: PlayerId,
    },
}

impl TileAction {
    /// Check whether this landing needs a decision.
    #[must_use]
    pub fn requires_decision(&self) -> bool {
        !matches!(self, TileAction::None)
    }
}

/// A completed dice roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    /// Face value, `1..=6`.
    pub value: u8,
    /// Tiles to walk, `path[i] = (start + i + 1) % board_size`.
    pub path: TilePath,
}

/// Result of one movement step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Moved onto `position`; more tiles remain.
    Moved {
        /// New tile.
        position: usize,
    },
    /// Reached the end of the path.
    Landed {
        /// Final tile.
        position: usize,
        /// What the landing requires.
        tile: TileAction,
    },
}

/// A completed purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Buyer.
    pub player: PlayerId,
    /// Asset bought.
    pub asset: AssetId,
    /// Amount paid into the prize pot.
    pub price: u64,
}

/// A completed rent settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentPayment {
    /// Visiting player.
    pub payer: PlayerId,
    /// Recipient, `None` when the recorded owner is not at the table.
    pub owner: Option<PlayerId>,
    /// Asset the rent was charged for.
    pub asset: AssetId,
    /// Amount transferred, `min(payer balance, rent)`.
    pub amount: u64,
    /// Rent that could not be covered and was not collected.
    pub shortfall: u64,
}

/// Something that happened during a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Dice rolled.
    Rolled {
        /// Roller.
        player: PlayerId,
        /// The roll and its path.
        roll: Roll,
    },
    /// A player moved one tile.
    Moved {
        /// Mover.
        player: PlayerId,
        /// New tile.
        position: usize,
    },
    /// A player finished walking its path.
    Landed {
        /// Mover.
        player: PlayerId,
        /// Final tile.
        position: usize,
        /// What the landing requires.
        tile: TileAction,
    },
    /// An asset was bought.
    Bought(Purchase),
    /// An offer was declined.
    Passed {
        /// Decliner.
        player: PlayerId,
        /// Asset declined.
        asset: AssetId,
    },
    /// Rent was settled.
    RentPaid(RentPayment),
    /// The turn moved to another player.
    TurnAdvanced {
        /// Previous player.
        from: PlayerId,
        /// New current player.
        to: PlayerId,
    },
    /// The customization overlay opened or closed.
    Customization {
        /// Whether it is now open.
        open: bool,
    },
    /// The game ended.
    Finished(GameResult),
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Several players tied for the highest net worth.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_into_action() {
        assert_eq!(Action::from(Decision::Buy), Action::Buy);
        assert_eq!(Action::from(Decision::Pass), Action::Pass);
        assert_eq!(Action::from(Decision::PayRent), Action::PayRent);
    }

    #[test]
    fn test_tile_action_requires_decision() {
        assert!(!TileAction::None.requires_decision());
        assert!(TileAction::OfferBuy(AssetId::new(1)).requires_decision());
        assert!(TileAction::OfferPay {
            asset: AssetId::new(1),
            owner: PlayerId::new(2),
        }
        .requires_decision());
    }

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let tie = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(tie.is_winner(PlayerId::new(0)));
        assert!(!tie.is_winner(PlayerId::new(1)));
        assert!(tie.is_winner(PlayerId::new(2)));
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::Rolled {
            player: PlayerId::new(0),
            roll: Roll {
                value: 3,
                path: SmallVec::from_slice(&[1, 2, 3]),
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(event, deserialized);
    }
}
