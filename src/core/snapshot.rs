//! Read-only views handed to the presentation layer.

use serde::{Deserialize, Serialize};

use super::action::TileAction;
use super::asset::AssetId;
use super::player::PlayerId;
use super::state::{GameState, GameStatus, TurnPhase};

/// One seat as the renderer sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Seat id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Token color.
    pub color: String,
    /// Avatar key.
    pub avatar: String,
    /// Current balance.
    pub balance: u64,
    /// Tile the token stands on.
    pub position: usize,
    /// Held assets, in id order.
    pub assets: Vec<AssetId>,
    /// Whether the policy plays this seat.
    pub is_ai: bool,
}

/// One asset tile and its owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    /// Asset on the tile.
    pub asset: AssetId,
    /// Token name.
    pub name: String,
    /// Tile index.
    pub position: usize,
    /// Purchase price.
    pub price: u64,
    /// Rent charged to other players.
    pub rent: u64,
    /// Current owner, if bought.
    pub owner: Option<PlayerId>,
}

/// Everything needed to draw one frame of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Number of tiles.
    pub board_size: usize,
    /// Turn counter, starting at 1.
    pub turn_number: u32,
    /// Seat whose turn it is.
    pub current_player: usize,
    /// Tile under the current player.
    pub current_tile: usize,
    /// Phase tag (`idle`, `moving`, `awaiting_buy`, `awaiting_pay`).
    pub phase: String,
    /// Decision the overlay should show, if any.
    pub pending: Option<TileAction>,
    /// Tiles still to animate in the current move.
    pub remaining_path: Vec<usize>,
    /// Whether the customization overlay is open.
    pub customizing: bool,
    /// Playing or finished.
    pub status: GameStatus,
    /// Accumulated purchase money.
    pub prize_pot: u64,
    /// Seats in turn order.
    pub players: Vec<PlayerView>,
    /// Asset tiles ordered by position.
    pub tiles: Vec<TileView>,
    /// Most recent log lines, oldest first.
    pub log: Vec<String>,
}

impl BoardSnapshot {
    /// Capture a snapshot with up to `log_lines` recent log lines.
    #[must_use]
    pub fn capture(state: &GameState, log_lines: usize) -> Self {
        let current = state.current_player();

        let (pending, remaining_path) = match state.phase() {
            TurnPhase::Idle => (None, Vec::new()),
            TurnPhase::Moving { path, step } => (None, path.iter().skip(*step).copied().collect()),
            TurnPhase::AwaitingBuy { .. } | TurnPhase::AwaitingPay { .. } => {
                (Some(state.resolve_tile()), Vec::new())
            }
        };

        Self {
            board_size: state.board_size(),
            turn_number: state.turn_number(),
            current_player: state.current_index(),
            current_tile: current.position,
            phase: state.phase().name().to_string(),
            pending,
            remaining_path,
            customizing: state.is_customizing(),
            status: state.status(),
            prize_pot: state.prize_pot(),
            players: state
                .players()
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    name: p.name.clone(),
                    color: p.color.clone(),
                    avatar: p.avatar.clone(),
                    balance: p.balance,
                    position: p.position,
                    assets: p.assets.iter().copied().collect(),
                    is_ai: p.is_ai,
                })
                .collect(),
            tiles: state
                .assets()
                .iter()
                .map(|a| TileView {
                    asset: a.id,
                    name: a.name.clone(),
                    position: a.position,
                    price: a.price,
                    rent: a.rent,
                    owner: a.owner,
                })
                .collect(),
            log: state.logs().recent(log_lines).map(ToString::to_string).collect(),
        }
    }

    /// Whether the renderer should accept a roll input.
    #[must_use]
    pub fn can_roll(&self) -> bool {
        self.status == GameStatus::Playing
            && self.phase == TurnPhase::Idle.name()
            && !self.customizing
    }

    /// Serialize as JSON for web front ends.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AssetConfig, GameConfig, PlayerConfig};

    #[test]
    fn test_capture_initial() {
        let config = GameConfig::new(8)
            .with_player(PlayerConfig::human("Alice").with_color("red"))
            .with_player(PlayerConfig::ai("Bot"))
            .with_asset(AssetConfig::new(0, "ETH", 3, 200, 50));
        let state = GameState::new(&config).unwrap();

        let snapshot = BoardSnapshot::capture(&state, 10);

        assert_eq!(snapshot.board_size, 8);
        assert_eq!(snapshot.current_player, 0);
        assert_eq!(snapshot.current_tile, 0);
        assert_eq!(snapshot.phase, "idle");
        assert_eq!(snapshot.pending, None);
        assert!(snapshot.can_roll());
        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(snapshot.players[0].color, "red");
        assert_eq!(snapshot.tiles.len(), 1);
        assert_eq!(snapshot.tiles[0].owner, None);
        assert!(snapshot.log.is_empty());
    }

    #[test]
    fn test_snapshot_json() {
        let state = GameState::new(&GameConfig::classic()).unwrap();
        let json = BoardSnapshot::capture(&state, 5).to_json().unwrap();
        let parsed: BoardSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.players.len(), 4);
        assert_eq!(parsed.tiles.len(), 12);
        assert_eq!(parsed.status, GameStatus::Playing);
    }
}
