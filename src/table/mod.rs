//! Headless match driver.
//!
//! `Table` plays whole turns on top of `BoardGame` so all-AI matches (and
//! the AI seats of mixed ones) can run without a presentation layer.

pub mod driver;

pub use driver::{MatchSummary, Table, TurnReport, TurnStop};
