//! Game bindings for Python.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::{Event, GameConfig, GameStatus};
use crate::error::GameError;
use crate::rules::{BoardGame, ThresholdPolicy};
use crate::table::Table;

use super::py_core::{PyAction, PyPlayerId};

fn rejected(err: GameError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn events_json(events: &[Event]) -> PyResult<String> {
    serde_json::to_string(events).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

/// Python wrapper for BoardGame.
///
/// Engine rejections raise `ValueError` and leave the game unchanged.
#[pyclass(name = "BoardGame")]
pub struct PyBoardGame {
    game: BoardGame,
}

#[pymethods]
impl PyBoardGame {
    /// Create a game.
    ///
    /// # Arguments
    /// - config_toml: TOML game configuration; the classic board when omitted
    /// - seed: overrides the configured dice seed
    #[new]
    #[pyo3(signature = (config_toml = None, seed = None))]
    fn new(config_toml: Option<&str>, seed: Option<u64>) -> PyResult<Self> {
        let mut config = match config_toml {
            Some(text) => {
                GameConfig::from_toml_str(text).map_err(|e| PyValueError::new_err(e.to_string()))?
            }
            None => GameConfig::classic(),
        };
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        let game = BoardGame::new(&config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { game })
    }

    /// Roll the dice. Returns the value rolled.
    fn roll(&mut self) -> PyResult<u8> {
        self.game.roll_dice().map(|roll| roll.value).map_err(rejected)
    }

    /// Move one tile. Returns the new position.
    fn step(&mut self) -> PyResult<usize> {
        self.game.step().map_err(rejected)?;
        Ok(self.game.state().current_player().position)
    }

    /// Walk the rest of the path. Returns the landing events as JSON.
    fn advance(&mut self) -> PyResult<String> {
        let events = self.game.apply(crate::core::Action::Advance).map_err(rejected)?;
        events_json(&events)
    }

    /// Buy the asset on offer.
    fn buy(&mut self) -> PyResult<()> {
        self.game.buy_asset().map(drop).map_err(rejected)
    }

    /// Decline the asset on offer.
    #[pyo3(name = "pass_")]
    fn pass(&mut self) -> PyResult<()> {
        self.game.pass().map(drop).map_err(rejected)
    }

    /// Pay rent. Returns the amount actually paid.
    fn pay_rent(&mut self) -> PyResult<u64> {
        self.game.pay_rent().map(|p| p.amount).map_err(rejected)
    }

    /// Hand the turn on. Returns the next player.
    fn end_turn(&mut self) -> PyResult<PyPlayerId> {
        self.game.advance_turn().map(PyPlayerId).map_err(rejected)
    }

    /// End the game. Returns the winning seats.
    fn finish(&mut self) -> PyResult<Vec<PyPlayerId>> {
        self.game.finish().map_err(rejected)?;
        Ok(self.winners())
    }

    /// Let the default AI policy answer a pending decision for an AI seat.
    ///
    /// Returns the events as JSON, or None when there was nothing to do.
    fn auto_decide(&mut self) -> PyResult<Option<String>> {
        match self.game.auto_decide(&ThresholdPolicy::default()).map_err(rejected)? {
            Some(events) => events_json(&events).map(Some),
            None => Ok(None),
        }
    }

    /// Apply any action. Returns the events as JSON.
    fn apply(&mut self, action: &PyAction) -> PyResult<String> {
        let events = self.game.apply(action.0).map_err(rejected)?;
        events_json(&events)
    }

    /// Actions the current player can take.
    fn legal_actions(&self) -> Vec<PyAction> {
        self.game.legal_actions().into_iter().map(PyAction).collect()
    }

    /// Play AI turns until a human decision, the end of the game or
    /// `max_turns`. Returns the number of turns played.
    #[pyo3(signature = (max_turns = 1))]
    fn play_ai_turns(&mut self, max_turns: u32) -> PyResult<u32> {
        let game = self.game.clone();
        let mut table = Table::with_policy(game, ThresholdPolicy::default());
        let summary = table.run(max_turns).map_err(rejected)?;
        self.game = table.into_game();
        Ok(summary.turns_played)
    }

    /// Board snapshot as JSON.
    #[pyo3(signature = (log_lines = 10))]
    fn snapshot_json(&self, log_lines: usize) -> PyResult<String> {
        self.game
            .snapshot(log_lines)
            .to_json()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Serialize the game state.
    fn to_bytes(&self) -> PyResult<Vec<u8>> {
        self.game.state().to_bytes().map_err(rejected)
    }

    /// Player whose turn it is.
    #[getter]
    fn current_player(&self) -> PyPlayerId {
        PyPlayerId(self.game.state().current_player().id)
    }

    /// Current turn number, starting at 1.
    #[getter]
    fn turn_number(&self) -> u32 {
        self.game.state().turn_number()
    }

    /// Number of seats.
    #[getter]
    fn player_count(&self) -> usize {
        self.game.state().player_count()
    }

    /// A player's balance.
    fn balance(&self, player: &PyPlayerId) -> PyResult<u64> {
        self.game
            .state()
            .player(player.0)
            .map(|p| p.balance)
            .ok_or_else(|| rejected(GameError::UnknownPlayer(player.0)))
    }

    /// Whether the game is over.
    fn is_finished(&self) -> bool {
        self.game.state().status() == GameStatus::Finished
    }

    /// Leaders by net worth.
    fn winners(&self) -> Vec<PyPlayerId> {
        let state = self.game.state();
        let result = state.standings();
        state
            .players()
            .iter()
            .filter(|p| result.is_winner(p.id))
            .map(|p| PyPlayerId(p.id))
            .collect()
    }

    fn __repr__(&self) -> String {
        let state = self.game.state();
        format!(
            "BoardGame(turn={}, current=P{}, phase={})",
            state.turn_number(),
            state.current_index(),
            state.phase().name()
        )
    }
}
