//! Error types for engine transitions and configuration.
//!
//! Guarded preconditions are reported as `GameError` values rather than
//! ignored, so callers (and tests) can tell a rejected action apart from
//! one that had no visible effect. A rejected action never mutates state.

use thiserror::Error;

use crate::core::{AssetId, PlayerId};

/// Errors returned by engine transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Another action (movement, decision overlay, customization) is pending.
    #[error("another action is still in progress")]
    ActionInProgress,

    /// A movement step was requested while no path is being walked.
    #[error("no movement in progress")]
    NotMoving,

    /// Buy, pass or pay was requested without a matching tile decision.
    #[error("no pending tile decision for this action")]
    NoPendingDecision,

    /// The current player cannot afford the asset on offer.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Price of the asset.
        needed: u64,
        /// Balance of the player.
        available: u64,
    },

    /// A dice source produced a value outside `1..=6`.
    #[error("invalid die value: {0}")]
    InvalidRoll(u8),

    /// The game has already finished.
    #[error("game is finished")]
    GameFinished,

    /// An asset id that is not on this board.
    #[error("unknown asset: {0}")]
    UnknownAsset(AssetId),

    /// The asset already has an owner.
    #[error("asset {0} is already owned")]
    AlreadyOwned(AssetId),

    /// A player id that is not at this table.
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// A checkpoint could not be encoded or decoded.
    #[error("checkpoint codec error: {0}")]
    Codec(String),
}

/// Result type for engine transitions.
pub type EngineResult<T> = Result<T, GameError>;

/// Errors produced while loading or validating a game configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The roster is empty.
    #[error("at least one player is required")]
    NoPlayers,

    /// More seats than `PlayerId` can address.
    #[error("too many players: {0} (max 255)")]
    TooManyPlayers(usize),

    /// A board with zero tiles.
    #[error("board must have at least one tile")]
    EmptyBoard,

    /// An asset placed outside the board.
    #[error("asset {asset} at position {position} is outside a board of {board_size} tiles")]
    AssetOffBoard {
        /// Offending asset.
        asset: AssetId,
        /// Its configured position.
        position: usize,
        /// Number of tiles on the board.
        board_size: usize,
    },

    /// Two assets configured on the same tile.
    #[error("more than one asset at position {0}")]
    DuplicatePosition(usize),

    /// Two assets sharing an id.
    #[error("duplicate asset id {0}")]
    DuplicateAsset(AssetId),

    /// Starting position outside the board.
    #[error("starting position {0} is outside the board")]
    StartOffBoard(usize),

    /// The AI buy margin has a zero denominator.
    #[error("ai buy margin denominator must be non-zero")]
    InvalidMargin,

    /// The configuration text could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The configuration file could not be read.
    #[error("io error: {0}")]
    Io(String),
}

/// A broken state invariant found by `GameState::check_invariants`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The turn pointer is outside the roster.
    #[error("current player index {index} out of range for {players} players")]
    TurnIndexOutOfRange {
        /// Stored index.
        index: usize,
        /// Roster size.
        players: usize,
    },

    /// A player stands outside the board.
    #[error("{player} at position {position} is off the board")]
    PlayerOffBoard {
        /// Player.
        player: PlayerId,
        /// Position.
        position: usize,
    },

    /// An asset names an owner whose set does not contain it.
    #[error("asset {asset} owned by {owner} is missing from that player's assets")]
    OrphanedOwner {
        /// Asset.
        asset: AssetId,
        /// Recorded owner.
        owner: PlayerId,
    },

    /// A player lists an asset that does not name them as owner.
    #[error("{player} lists asset {asset} which it does not own")]
    OrphanedHolding {
        /// Player.
        player: PlayerId,
        /// Asset.
        asset: AssetId,
    },

    /// A seat's id does not match its place in turn order.
    #[error("seat {index} holds {player}")]
    SeatMismatch {
        /// Position in the roster.
        index: usize,
        /// Id stored in that seat.
        player: PlayerId,
    },

    /// An asset sits outside the board.
    #[error("asset {asset} at position {position} is off the board")]
    AssetOffBoard {
        /// Asset.
        asset: AssetId,
        /// Position.
        position: usize,
    },

    /// Two assets share a tile.
    #[error("more than one asset on tile {0}")]
    SharedTile(usize),

    /// The moving phase has no tile left to walk.
    #[error("move at step {step} of a {len}-tile path")]
    ExhaustedPath {
        /// Tiles already walked.
        step: usize,
        /// Path length.
        len: usize,
    },

    /// A tile of the rolled path is outside the board.
    #[error("path tile {0} is off the board")]
    PathOffBoard(usize),

    /// The pending decision names an asset that is not on the board.
    #[error("pending decision on unknown asset {0}")]
    UnknownPendingAsset(AssetId),
}
