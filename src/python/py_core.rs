//! Core type bindings for Python.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{Action, PlayerId};

/// Python wrapper for PlayerId.
#[pyclass(name = "PlayerId")]
#[derive(Clone, Debug)]
pub struct PyPlayerId(pub PlayerId);

#[pymethods]
impl PyPlayerId {
    /// Create a new player ID.
    #[new]
    fn new(id: u8) -> Self {
        Self(PlayerId::new(id))
    }

    /// Get the seat index (0-based).
    fn index(&self) -> usize {
        self.0.index()
    }

    /// Get the raw ID value.
    #[getter]
    fn id(&self) -> u8 {
        self.0 .0
    }

    fn __repr__(&self) -> String {
        format!("PlayerId({})", self.0 .0)
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        self.0 .0 as u64
    }
}

/// Python wrapper for Action.
///
/// Built from its snake_case name, e.g. `Action("pay_rent")`.
#[pyclass(name = "Action")]
#[derive(Clone, Debug)]
pub struct PyAction(pub Action);

#[pymethods]
impl PyAction {
    #[new]
    fn new(name: &str) -> PyResult<Self> {
        let action = match name {
            "roll" => Action::Roll,
            "step" => Action::Step,
            "advance" => Action::Advance,
            "buy" => Action::Buy,
            "pass" => Action::Pass,
            "pay_rent" => Action::PayRent,
            "end_turn" => Action::EndTurn,
            "open_customization" => Action::OpenCustomization,
            "close_customization" => Action::CloseCustomization,
            "finish" => Action::Finish,
            other => return Err(PyValueError::new_err(format!("unknown action: {other}"))),
        };
        Ok(Self(action))
    }

    /// The action's name.
    #[getter]
    fn name(&self) -> &'static str {
        match self.0 {
            Action::Roll => "roll",
            Action::Step => "step",
            Action::Advance => "advance",
            Action::Buy => "buy",
            Action::Pass => "pass",
            Action::PayRent => "pay_rent",
            Action::EndTurn => "end_turn",
            Action::OpenCustomization => "open_customization",
            Action::CloseCustomization => "close_customization",
            Action::Finish => "finish",
        }
    }

    fn __repr__(&self) -> String {
        format!("Action({})", self.name())
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        self.0 as u64
    }
}
