//! Python bindings for the cryptopoly engine.
//!
//! # Quick Start
//!
//! ```python
//! import cryptopoly as cp
//!
//! game = cp.BoardGame(seed=7)
//! game.roll()
//! game.advance()
//! if cp.Action("buy") in game.legal_actions():
//!     game.buy()
//! print(game.snapshot_json())
//! ```

use pyo3::prelude::*;

mod py_core;
mod py_game;

pub use py_core::*;
pub use py_game::*;

/// cryptopoly: a turn-based crypto board game engine.
#[pymodule]
fn cryptopoly(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPlayerId>()?;
    m.add_class::<PyAction>()?;
    m.add_class::<PyBoardGame>()?;
    Ok(())
}
