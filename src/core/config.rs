//! Game configuration types.
//!
//! Games are configured at startup by providing:
//! - `AssetConfig`: one purchasable tile (position, price, rent)
//! - `PlayerConfig`: one seat of the roster
//! - `GameConfig`: board size, assets, roster and starting values
//!
//! Configurations can be built in code or loaded from TOML:
//!
//! ```
//! use cryptopoly::core::GameConfig;
//!
//! let config = GameConfig::from_toml_str(r#"
//!     board_size = 8
//!     starting_balance = 1000
//!
//!     [[assets]]
//!     id = 0
//!     name = "ETH"
//!     position = 3
//!     price = 200
//!     rent = 50
//!
//!     [[players]]
//!     name = "Alice"
//!
//!     [[players]]
//!     name = "Bot"
//!     ai = true
//! "#).unwrap();
//!
//! assert_eq!(config.players.len(), 2);
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::asset::{Asset, AssetId};
use super::player::{Player, PlayerId};
use crate::error::ConfigError;

/// Default starting balance for every seat.
pub const DEFAULT_STARTING_BALANCE: u64 = 1000;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

/// Configuration for a single purchasable tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Unique identifier.
    pub id: u16,

    /// Display name.
    pub name: String,

    /// Tile index.
    pub position: usize,

    /// Purchase price.
    pub price: u64,

    /// Rent charged to visitors.
    pub rent: u64,
}

impl AssetConfig {
    /// Create a new asset configuration.
    pub fn new(id: u16, name: impl Into<String>, position: usize, price: u64, rent: u64) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            price,
            rent,
        }
    }

    fn build(&self) -> Asset {
        Asset::new(AssetId::new(self.id), self.name.clone(), self.position, self.price, self.rent)
    }
}

/// Configuration for one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name.
    pub name: String,

    /// Display color.
    #[serde(default)]
    pub color: String,

    /// Avatar key.
    #[serde(default)]
    pub avatar: String,

    /// Controlled by the decision policy.
    #[serde(default, rename = "ai")]
    pub is_ai: bool,

    /// Overrides `GameConfig::starting_balance` for this seat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,
}

impl PlayerConfig {
    /// Create a human seat.
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: String::new(),
            avatar: String::new(),
            is_ai: false,
            balance: None,
        }
    }

    /// Create an AI seat.
    pub fn ai(name: impl Into<String>) -> Self {
        Self {
            is_ai: true,
            ..Self::human(name)
        }
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

    /// Give this seat its own starting balance.
    #[must_use]
    pub fn with_balance(mut self, balance: u64) -> Self {
        self.balance = Some(balance);
        self
    }
}

/// Ratio a balance must exceed, relative to the price, before the
/// automatic policy buys. Default 6/5 (balance > price * 1.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyMargin {
    /// Numerator of the ratio.
    pub numerator: u64,
    /// Denominator of the ratio (non-zero).
    pub denominator: u64,
}

impl BuyMargin {
    /// Check whether `balance > price * numerator / denominator`.
    #[must_use]
    pub fn allows(&self, balance: u64, price: u64) -> bool {
        u128::from(balance) * u128::from(self.denominator)
            > u128::from(price) * u128::from(self.numerator)
    }
}

impl Default for BuyMargin {
    fn default() -> Self {
        Self {
            numerator: 6,
            denominator: 5,
        }
    }
}

fn default_starting_balance() -> u64 {
    DEFAULT_STARTING_BALANCE
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// TOML integers are signed 64-bit, so seeds above `i64::MAX` round-trip
/// as decimal strings.
mod seed_repr {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Seed {
        Int(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(seed: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        match i64::try_from(*seed) {
            Ok(value) => Seed::Int(value),
            Err(_) => Seed::Text(seed.to_string()),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Seed::deserialize(deserializer)? {
            Seed::Int(value) => u64::try_from(value)
                .map_err(|_| D::Error::custom(format!("negative seed {value}"))),
            Seed::Text(text) => text
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid seed {text:?}"))),
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of tiles on the board.
    pub board_size: usize,

    /// Purchasable tiles. Tiles without an asset are free to land on.
    #[serde(default)]
    pub assets: Vec<AssetConfig>,

    /// Roster in turn order.
    #[serde(default)]
    pub players: Vec<PlayerConfig>,

    /// Balance every seat starts with unless overridden.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: u64,

    /// Tile every seat starts on.
    #[serde(default)]
    pub starting_position: usize,

    /// Initial prize pot.
    #[serde(default)]
    pub prize_pot: u64,

    /// Dice seed. Written as a string when it does not fit a TOML integer.
    #[serde(default = "default_seed", with = "seed_repr")]
    pub seed: u64,

    /// Finish the game automatically once this many turns have passed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,

    /// Threshold for automatic purchases.
    #[serde(default)]
    pub ai_buy_margin: BuyMargin,
}

impl GameConfig {
    /// Create an empty configuration for a board of `board_size` tiles.
    #[must_use]
    pub fn new(board_size: usize) -> Self {
        Self {
            board_size,
            assets: Vec::new(),
            players: Vec::new(),
            starting_balance: DEFAULT_STARTING_BALANCE,
            starting_position: 0,
            prize_pot: 0,
            seed: DEFAULT_SEED,
            max_turns: None,
            ai_buy_margin: BuyMargin::default(),
        }
    }

    /// The default 16-tile crypto board with one human and three AI seats.
    #[must_use]
    pub fn classic() -> Self {
        const TOKENS: [(&str, u64, u64); 12] = [
            ("DOGE", 60, 6),
            ("SHIB", 80, 8),
            ("ADA", 100, 10),
            ("XRP", 120, 12),
            ("DOT", 140, 14),
            ("AVAX", 160, 16),
            ("LINK", 180, 18),
            ("MATIC", 200, 20),
            ("SOL", 240, 24),
            ("BNB", 280, 28),
            ("ETH", 320, 32),
            ("BTC", 400, 50),
        ];

        // Corners (0, 4, 8, 12) stay free.
        let positions = (0..16).filter(|p| p % 4 != 0);

        let mut config = Self::new(16)
            .with_player(PlayerConfig::human("You").with_color("#22d3ee").with_avatar("astronaut"))
            .with_player(PlayerConfig::ai("Satoshi").with_color("#f7931a").with_avatar("robot"))
            .with_player(PlayerConfig::ai("Vitalik").with_color("#627eea").with_avatar("wizard"))
            .with_player(PlayerConfig::ai("Hal").with_color("#a3e635").with_avatar("ghost"));

        for (i, ((name, price, rent), position)) in TOKENS.iter().zip(positions).enumerate() {
            config = config.with_asset(AssetConfig::new(i as u16, *name, position, *price, *rent));
        }
        config
    }

    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Render this configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Add an asset.
    #[must_use]
    pub fn with_asset(mut self, asset: AssetConfig) -> Self {
        self.assets.push(asset);
        self
    }

    /// Add a seat at the end of the turn order.
    #[must_use]
    pub fn with_player(mut self, player: PlayerConfig) -> Self {
        self.players.push(player);
        self
    }

    /// Set the default starting balance.
    #[must_use]
    pub fn with_starting_balance(mut self, balance: u64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Set the starting tile.
    #[must_use]
    pub fn with_starting_position(mut self, position: usize) -> Self {
        self.starting_position = position;
        self
    }

    /// Set the initial prize pot.
    #[must_use]
    pub fn with_prize_pot(mut self, pot: u64) -> Self {
        self.prize_pot = pot;
        self
    }

    /// Set the dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Finish automatically after `turns` turns.
    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = Some(turns);
        self
    }

    /// Set the automatic purchase threshold.
    #[must_use]
    pub fn with_ai_margin(mut self, numerator: u64, denominator: u64) -> Self {
        self.ai_buy_margin = BuyMargin {
            numerator,
            denominator,
        };
        self
    }

    /// Check the configuration for structural errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        if self.players.len() > 255 {
            return Err(ConfigError::TooManyPlayers(self.players.len()));
        }
        if self.board_size == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.starting_position >= self.board_size {
            return Err(ConfigError::StartOffBoard(self.starting_position));
        }
        if self.ai_buy_margin.denominator == 0 {
            return Err(ConfigError::InvalidMargin);
        }

        let mut ids = HashSet::new();
        let mut positions = HashSet::new();
        for asset in &self.assets {
            let id = AssetId::new(asset.id);
            if asset.position >= self.board_size {
                return Err(ConfigError::AssetOffBoard {
                    asset: id,
                    position: asset.position,
                    board_size: self.board_size,
                });
            }
            if !ids.insert(asset.id) {
                return Err(ConfigError::DuplicateAsset(id));
            }
            if !positions.insert(asset.position) {
                return Err(ConfigError::DuplicatePosition(asset.position));
            }
        }
        Ok(())
    }

    /// Build the board, ordered by tile position.
    #[must_use]
    pub fn build_assets(&self) -> Vec<Asset> {
        let mut assets: Vec<Asset> = self.assets.iter().map(AssetConfig::build).collect();
        assets.sort_by_key(|a| a.position);
        assets
    }

    /// Build the roster in turn order.
    #[must_use]
    pub fn build_players(&self) -> Vec<Player> {
        self.players
            .iter()
            .zip(PlayerId::all(self.players.len()))
            .map(|(seat, id)| {
                let balance = seat.balance.unwrap_or(self.starting_balance);
                let mut player = Player::new(id, seat.name.clone(), balance)
                    .with_color(seat.color.clone())
                    .with_avatar(seat.avatar.clone())
                    .at(self.starting_position);
                player.is_ai = seat.is_ai;
                player
            })
            .collect()
    }
}
