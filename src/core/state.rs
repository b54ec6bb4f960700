//! Game state: roster, board, turn pointer and log.
//!
//! ## GameState
//!
//! The single owned value every transition reads and writes:
//! - Players in turn order and the current-player index
//! - The board (assets by tile) and its size
//! - The turn phase (idle, moving, awaiting a decision)
//! - The bounded game log and prize pot
//! - The dice RNG
//!
//! Uses `im` persistent collections so snapshots handed to the presentation
//! layer are O(1) clones.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::action::{GameResult, TileAction, TilePath};
use super::asset::{Asset, AssetId};
use super::config::{BuyMargin, GameConfig};
use super::log::GameLog;
use super::player::{Player, PlayerId};
use super::rng::{GameRng, GameRngState};
use crate::error::{ConfigError, EngineResult, GameError, InvariantViolation};

/// Whether the game is still running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Accepting actions.
    #[default]
    Playing,
    /// Ended; every mutating action is rejected.
    Finished,
}

/// Where the current player is within its turn.
///
/// ```text
/// Idle -> Moving (one step per tile) -> landing
/// landing --(no asset / own asset)--> Idle, next player
/// landing --(unowned)--> AwaitingBuy --(buy | pass)--> Idle, next player
/// landing --(owned by other)--> AwaitingPay --(pay)--> Idle, next player
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Ready to roll.
    #[default]
    Idle,
    /// Walking a rolled path; `step` tiles already taken.
    Moving {
        /// Full path of the roll.
        path: TilePath,
        /// Number of tiles already walked.
        step: usize,
    },
    /// Landed on an unowned asset.
    AwaitingBuy {
        /// Asset on offer.
        asset: AssetId,
    },
    /// Landed on another player's asset.
    AwaitingPay {
        /// Asset charging rent.
        asset: AssetId,
    },
}

impl TurnPhase {
    /// Check whether the phase is `Idle`.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, TurnPhase::Idle)
    }

    /// Check whether a path is being walked.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        matches!(self, TurnPhase::Moving { .. })
    }

    /// Short tag for logs and snapshots.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Moving { .. } => "moving",
            TurnPhase::AwaitingBuy { .. } => "awaiting_buy",
            TurnPhase::AwaitingPay { .. } => "awaiting_pay",
        }
    }
}

/// Complete game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) players: Vector<Player>,
    pub(crate) assets: Vector<Asset>,

    /// Tile position to index in `assets`. Rebuilt after decoding.
    #[serde(skip)]
    pub(crate) tile_index: FxHashMap<usize, usize>,

    pub(crate) board_size: usize,
    pub(crate) current_player: usize,
    pub(crate) logs: GameLog,
    pub(crate) prize_pot: u64,
    pub(crate) status: GameStatus,
    pub(crate) phase: TurnPhase,
    pub(crate) customizing: bool,

    /// Starts at 1, incremented on every turn advance.
    pub(crate) turn_number: u32,

    pub(crate) max_turns: Option<u32>,
    pub(crate) buy_margin: BuyMargin,

    /// Deterministic dice.
    pub(crate) rng: GameRng,
}

impl GameState {
    /// Build the initial state from a validated configuration.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            players: config.build_players().into_iter().collect(),
            assets: config.build_assets().into_iter().collect(),
            tile_index: FxHashMap::default(),
            board_size: config.board_size,
            current_player: 0,
            logs: GameLog::new(),
            prize_pot: config.prize_pot,
            status: GameStatus::Playing,
            phase: TurnPhase::Idle,
            customizing: false,
            turn_number: 1,
            max_turns: config.max_turns,
            buy_margin: config.ai_buy_margin,
            rng: GameRng::new(config.seed),
        };
        state.reindex();
        Ok(state)
    }

    fn reindex(&mut self) {
        self.tile_index = self
            .assets
            .iter()
            .enumerate()
            .map(|(i, a)| (a.position, i))
            .collect();
    }

    // === Roster ===

    /// Players in turn order.
    #[must_use]
    pub fn players(&self) -> &Vector<Player> {
        &self.players
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Index of the player whose turn it is.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_player
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub(crate) fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player]
    }

    // === Board ===

    /// Assets ordered by tile position.
    #[must_use]
    pub fn assets(&self) -> &Vector<Asset> {
        &self.assets
    }

    /// Look up an asset by id.
    #[must_use]
    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub(crate) fn asset_mut(&mut self, id: AssetId) -> Option<&mut Asset> {
        self.assets.iter_mut().find(|a| a.id == id)
    }

    /// The asset on a tile, if any.
    #[must_use]
    pub fn asset_at(&self, position: usize) -> Option<&Asset> {
        self.tile_index.get(&position).and_then(|&i| self.assets.get(i))
    }

    /// Number of tiles.
    #[must_use]
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Tiles walked by a roll of `roll` starting from `start`.
    #[must_use]
    pub fn path_from(&self, start: usize, roll: u8) -> TilePath {
        let mut path = TilePath::new();
        let mut tile = start;
        for _ in 0..roll {
            tile = (tile + 1) % self.board_size;
            path.push(tile);
        }
        path
    }

    /// What the tile under the current player requires.
    #[must_use]
    pub fn resolve_tile(&self) -> TileAction {
        let player = self.current_player();
        match self.asset_at(player.position) {
            None => TileAction::None,
            Some(asset) => match asset.owner {
                None => TileAction::OfferBuy(asset.id),
                Some(owner) if owner == player.id => TileAction::None,
                Some(owner) => TileAction::OfferPay {
                    asset: asset.id,
                    owner,
                },
            },
        }
    }

    // === Progress ===

    /// The bounded game log.
    #[must_use]
    pub fn logs(&self) -> &GameLog {
        &self.logs
    }

    /// Accumulated purchase money.
    #[must_use]
    pub fn prize_pot(&self) -> u64 {
        self.prize_pot
    }

    /// Playing or finished.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Current turn phase.
    #[must_use]
    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// Whether the customization overlay is open.
    #[must_use]
    pub fn is_customizing(&self) -> bool {
        self.customizing
    }

    /// Turn counter, starting at 1.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Turn limit after which the game finishes, if any.
    #[must_use]
    pub fn max_turns(&self) -> Option<u32> {
        self.max_turns
    }

    /// Threshold used by the automatic buyer.
    #[must_use]
    pub fn buy_margin(&self) -> BuyMargin {
        self.buy_margin
    }

    /// Whether a roll would be rejected by the busy guard.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.phase.is_idle() || self.customizing
    }

    /// Dice RNG position, for replays.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    // === Standings ===

    /// Balance plus the purchase price of every held asset.
    #[must_use]
    pub fn net_worth(&self, id: PlayerId) -> u64 {
        let Some(player) = self.player(id) else {
            return 0;
        };
        player
            .assets
            .iter()
            .filter_map(|&a| self.asset(a))
            .fold(player.balance, |total, a| total.saturating_add(a.price))
    }

    /// Players with the highest net worth.
    #[must_use]
    pub fn standings(&self) -> GameResult {
        let best = self
            .players
            .iter()
            .map(|p| self.net_worth(p.id))
            .max()
            .unwrap_or(0);
        let mut leaders: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| self.net_worth(p.id) == best)
            .map(|p| p.id)
            .collect();

        if leaders.len() == 1 {
            GameResult::Winner(leaders.remove(0))
        } else {
            GameResult::Winners(leaders)
        }
    }

    // === Setup ===

    /// Give an unowned asset to a player without payment.
    ///
    /// Used to restore arranged positions (saved games, scenarios).
    pub fn grant_asset(&mut self, asset: AssetId, player: PlayerId) -> EngineResult<()> {
        if self.player(player).is_none() {
            return Err(GameError::UnknownPlayer(player));
        }
        let entry = self.asset_mut(asset).ok_or(GameError::UnknownAsset(asset))?;
        if entry.owner.is_some() {
            return Err(GameError::AlreadyOwned(asset));
        }
        entry.owner = Some(player);
        self.players[player.index()].assets.insert(asset);
        Ok(())
    }

    // === Audit ===

    /// Verify the structural invariants of the state.
    ///
    /// - the turn pointer is a valid seat and seat ids follow turn order
    /// - every player and asset stands on the board, one asset per tile
    /// - ownership agrees in both directions
    /// - the turn phase points at a walkable path or an existing asset
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.current_player >= self.players.len() {
            return Err(InvariantViolation::TurnIndexOutOfRange {
                index: self.current_player,
                players: self.players.len(),
            });
        }

        for (index, player) in self.players.iter().enumerate() {
            if player.id.index() != index {
                return Err(InvariantViolation::SeatMismatch {
                    index,
                    player: player.id,
                });
            }
        }

        let mut tiles = FxHashSet::default();
        for asset in &self.assets {
            if asset.position >= self.board_size {
                return Err(InvariantViolation::AssetOffBoard {
                    asset: asset.id,
                    position: asset.position,
                });
            }
            if !tiles.insert(asset.position) {
                return Err(InvariantViolation::SharedTile(asset.position));
            }
        }

        match &self.phase {
            TurnPhase::Idle => {}
            TurnPhase::Moving { path, step } => {
                if *step >= path.len() {
                    return Err(InvariantViolation::ExhaustedPath {
                        step: *step,
                        len: path.len(),
                    });
                }
                if let Some(&tile) = path.iter().find(|&&t| t >= self.board_size) {
                    return Err(InvariantViolation::PathOffBoard(tile));
                }
            }
            TurnPhase::AwaitingBuy { asset } | TurnPhase::AwaitingPay { asset } => {
                if self.asset(*asset).is_none() {
                    return Err(InvariantViolation::UnknownPendingAsset(*asset));
                }
            }
        }

        for player in &self.players {
            if player.position >= self.board_size {
                return Err(InvariantViolation::PlayerOffBoard {
                    player: player.id,
                    position: player.position,
                });
            }
            for &asset in &player.assets {
                if self.asset(asset).and_then(|a| a.owner) != Some(player.id) {
                    return Err(InvariantViolation::OrphanedHolding {
                        player: player.id,
                        asset,
                    });
                }
            }
        }

        for asset in &self.assets {
            if let Some(owner) = asset.owner {
                if !self.player(owner).is_some_and(|p| p.owns(asset.id)) {
                    return Err(InvariantViolation::OrphanedOwner {
                        asset: asset.id,
                        owner,
                    });
                }
            }
        }

        Ok(())
    }

    // === Checkpoints ===

    /// Encode the full state, dice position included.
    pub fn to_bytes(&self) -> EngineResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| GameError::Codec(e.to_string()))
    }

    /// Decode a checkpoint written by `to_bytes`.
    ///
    /// Checkpoints that break a state invariant are rejected.
    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        let mut state: Self =
            bincode::deserialize(bytes).map_err(|e| GameError::Codec(e.to_string()))?;
        if state.board_size == 0 || state.players.is_empty() {
            return Err(GameError::Codec("empty board or roster".to_string()));
        }
        state.reindex();
        state
            .check_invariants()
            .map_err(|e| GameError::Codec(e.to_string()))?;
        Ok(state)
    }
}
