//! Core engine types: players, assets, state, actions, dice, configuration.
//!
//! Everything the transitions in `rules` read and write lives here. The
//! presentation layer only ever sees `BoardSnapshot`s and `Event`s.

pub mod player;
pub mod asset;
pub mod rng;
pub mod config;
pub mod log;
pub mod action;
pub mod state;
pub mod snapshot;

pub use player::{Player, PlayerId};
pub use asset::{Asset, AssetId};
pub use rng::{DiceSource, GameRng, GameRngState, ScriptedDice, DIE_FACES};
pub use config::{AssetConfig, BuyMargin, GameConfig, PlayerConfig};
pub use log::{Clock, GameLog, LogEntry, LogKind, ManualClock, SystemClock, LOG_CAPACITY};
pub use action::{
    Action, Decision, Event, GameResult, Purchase, RentPayment, Roll, StepOutcome, TileAction,
    TilePath,
};
pub use state::{GameState, GameStatus, TurnPhase};
pub use snapshot::{BoardSnapshot, PlayerView, TileView};
