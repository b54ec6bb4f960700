//! # cryptopoly
//!
//! A turn-based board game engine in the style of Monopoly, themed on
//! crypto tokens.
//!
//! ## Design Principles
//!
//! 1. **One Writer**: `BoardGame` owns the `GameState` and is the only code
//!    that mutates it. Presentation code reads snapshots and events.
//!
//! 2. **Explicit Rejections**: Every operation whose preconditions fail
//!    returns a `GameError` and leaves the state untouched.
//!
//! 3. **Deterministic**: Dice come from a seeded ChaCha stream or any
//!    `DiceSource`, and log timestamps from a `Clock`, so whole matches can
//!    be replayed.
//!
//! ## Modules
//!
//! - `core`: Players, assets, state, actions, dice, log, configuration
//! - `rules`: The engine and AI decision policies
//! - `table`: Headless driver for playing whole turns
//! - `error`: Error types

pub mod core;
pub mod error;
pub mod rules;
pub mod table;

#[cfg(feature = "python")]
pub mod python;

pub use crate::core::{
    Action, Asset, AssetConfig, AssetId, BoardSnapshot, Decision, Event, GameConfig, GameLog,
    GameResult, GameState, GameStatus, LogEntry, LogKind, Player, PlayerConfig, PlayerId,
    TileAction, TurnPhase,
};
pub use crate::error::{ConfigError, EngineResult, GameError, InvariantViolation};
pub use crate::rules::{BoardGame, DecisionPolicy, GreedyPolicy, ThresholdPolicy};
pub use crate::table::{MatchSummary, Table, TurnReport, TurnStop};
