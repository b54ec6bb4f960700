//! Player identification and per-seat data.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier supporting 1-255 players. A player's id is
//! also its position in turn order.
//!
//! ## Player
//!
//! Balance, board position and holdings for one seat, plus display-only
//! fields the presentation layer reads back.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::asset::AssetId;

/// Player identifier supporting 1-255 players.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use cryptopoly::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(255) as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier, equal to the seat index.
    pub id: PlayerId,

    /// Display name, also used as the `user` of log entries.
    pub name: String,

    /// Display color (CSS-style string).
    pub color: String,

    /// Avatar key for the renderer.
    pub avatar: String,

    /// Currency on hand. Unsigned: transitions cap debits at this value.
    pub balance: u64,

    /// Tile index, always `< board_size`.
    pub position: usize,

    /// Owned assets.
    pub assets: OrdSet<AssetId>,

    /// Whether the automatic decision policy plays this seat.
    pub is_ai: bool,
}

impl Player {
    /// Create a human player with empty holdings at tile 0.
    pub fn new(id: PlayerId, name: impl Into<String>, balance: u64) -> Self {
        Self {
            id,
            name: name.into(),
            color: String::new(),
            avatar: String::new(),
            balance,
            position: 0,
            assets: OrdSet::new(),
            is_ai: false,
        }
    }

    /// Mark this seat as AI-controlled.
    #[must_use]
    pub fn ai(mut self) -> Self {
        self.is_ai = true;
        self
    }

    /// Set the display color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the avatar key.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    /// Set the starting tile.
    #[must_use]
    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Check whether this player holds an asset.
    #[must_use]
    pub fn owns(&self, asset: AssetId) -> bool {
        self.assets.contains(&asset)
    }
}
