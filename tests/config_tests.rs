//! Configuration tests.
//!
//! TOML loading, validation and the classic board.

use cryptopoly::core::{AssetConfig, GameConfig, PlayerConfig};
use cryptopoly::error::ConfigError;
use cryptopoly::rules::BoardGame;

const SMALL_BOARD: &str = r##"
board_size = 10
starting_balance = 500
seed = 9
max_turns = 30

[ai_buy_margin]
numerator = 3
denominator = 2

[[players]]
name = "Ada"
color = "#ff0000"

[[players]]
name = "Bot"
ai = true
balance = 750

[[assets]]
id = 0
name = "ADA"
position = 2
price = 100
rent = 10

[[assets]]
id = 1
name = "BTC"
position = 7
price = 400
rent = 50
"##;

#[test]
fn test_load_from_toml() {
    let config = GameConfig::from_toml_str(SMALL_BOARD).unwrap();

    assert_eq!(config.board_size, 10);
    assert_eq!(config.max_turns, Some(30));
    assert_eq!(config.ai_buy_margin.numerator, 3);
    assert_eq!(config.players.len(), 2);
    assert!(!config.players[0].is_ai);
    assert!(config.players[1].is_ai);

    let game = BoardGame::new(&config).unwrap();
    let state = game.state();
    assert_eq!(state.players()[0].balance, 500);
    assert_eq!(state.players()[1].balance, 750);
    assert_eq!(state.asset_at(7).unwrap().name, "BTC");
    assert_eq!(state.max_turns(), Some(30));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("cryptopoly-config-{}.toml", std::process::id()));
    std::fs::write(&path, SMALL_BOARD).unwrap();

    let config = GameConfig::from_toml_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.seed, 9);
}

#[test]
fn test_missing_file() {
    let result = GameConfig::from_toml_file("/definitely/not/here.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_malformed_toml() {
    let result = GameConfig::from_toml_str("board_size = \"eight\"");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_boards_are_rejected() {
    let base = || GameConfig::new(8).with_player(PlayerConfig::human("A"));

    assert_eq!(GameConfig::new(8).validate(), Err(ConfigError::NoPlayers));
    assert_eq!(
        GameConfig::new(0).with_player(PlayerConfig::human("A")).validate(),
        Err(ConfigError::EmptyBoard)
    );
    assert!(matches!(
        base().with_asset(AssetConfig::new(0, "X", 8, 10, 1)).validate(),
        Err(ConfigError::AssetOffBoard { position: 8, .. })
    ));
    assert_eq!(
        base()
            .with_asset(AssetConfig::new(0, "X", 2, 10, 1))
            .with_asset(AssetConfig::new(1, "Y", 2, 10, 1))
            .validate(),
        Err(ConfigError::DuplicatePosition(2))
    );
    assert_eq!(base().with_starting_position(9).validate(), Err(ConfigError::StartOffBoard(9)));
    assert_eq!(base().with_ai_margin(1, 0).validate(), Err(ConfigError::InvalidMargin));
    assert!(BoardGame::new(&GameConfig::new(8)).is_err());
}

#[test]
fn test_classic_round_trips_through_toml() {
    let classic = GameConfig::classic();
    let text = classic.to_toml_string().unwrap();
    assert_eq!(GameConfig::from_toml_str(&text).unwrap(), classic);
}
