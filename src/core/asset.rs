//! Board tiles that can be bought and collect rent.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Asset identifier, unique within a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u16);

impl AssetId {
    /// Create a new asset ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Asset({})", self.0)
    }
}

/// A purchasable tile.
///
/// `owner` is set once, by a purchase, and must stay consistent with the
/// owning player's `assets` set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier.
    pub id: AssetId,

    /// Display name (token or project name).
    pub name: String,

    /// Tile index this asset occupies.
    pub position: usize,

    /// Purchase price.
    pub price: u64,

    /// Rent charged to visiting players.
    pub rent: u64,

    /// Owning player, if bought.
    pub owner: Option<PlayerId>,
}

impl Asset {
    /// Create an unowned asset.
    pub fn new(
        id: AssetId,
        name: impl Into<String>,
        position: usize,
        price: u64,
        rent: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            price,
            rent,
            owner: None,
        }
    }

    /// Check whether nobody owns this asset yet.
    #[must_use]
    pub fn is_unowned(&self) -> bool {
        self.owner.is_none()
    }
}
