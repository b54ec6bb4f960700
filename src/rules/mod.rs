//! Turn rules: the engine and the automatic decision policies.
//!
//! `BoardGame` applies every transition of a turn (roll, move, resolve,
//! buy / pass / pay, advance). `DecisionPolicy` implementations choose
//! decisions for AI seats without touching state.

pub mod engine;
pub mod policy;

pub use engine::BoardGame;
pub use policy::{DecisionPolicy, GreedyPolicy, ThresholdPolicy};
