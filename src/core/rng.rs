//! Dice sources.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical rolls
//! - **Serializable**: O(1) state capture and restore for checkpoints
//! - **Pluggable**: Transitions accept any `DiceSource`, so tests and
//!   replays can force specific rolls with `ScriptedDice`
//!
//! ```
//! use cryptopoly::core::{DiceSource, GameRng};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll_die(), b.roll_die());
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Number of faces on the die.
pub const DIE_FACES: u8 = 6;

/// Anything that can produce a die value.
///
/// Implementations should return values in `1..=DIE_FACES`; the engine
/// rejects anything else.
pub trait DiceSource {
    /// Roll one die.
    fn roll_die(&mut self) -> u8;
}

/// Deterministic RNG backing the game's dice.
///
/// Uses ChaCha8 for speed while maintaining uniform, seedable output.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "GameRngState", into = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl DiceSource for GameRng {
    fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=DIE_FACES)
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many rolls have been made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        Self::from_state(&state)
    }
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

/// Dice that replay a fixed sequence of values.
///
/// Once the script runs out every roll returns `fallback`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<u8>,
    fallback: u8,
}

impl ScriptedDice {
    /// Create dice that return `rolls` in order, then 1 forever.
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: 1,
        }
    }

    /// Dice that always show the same face.
    #[must_use]
    pub fn always(value: u8) -> Self {
        Self {
            rolls: VecDeque::new(),
            fallback: value,
        }
    }

    /// Number of scripted rolls left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.roll_die(), rng2.roll_die());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..20).map(|_| rng1.roll_die()).collect();
        let seq2: Vec<_> = (0..20).map(|_| rng2.roll_die()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_roll_covers_all_faces() {
        let mut rng = GameRng::new(7);
        let mut seen = [false; DIE_FACES as usize];

        for _ in 0..600 {
            let value = rng.roll_die();
            assert!((1..=DIE_FACES).contains(&value));
            seen[(value - 1) as usize] = true;
        }

        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_state_round_trip_resumes_sequence() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.roll_die();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.roll_die()).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.roll_die()).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_rng_serde_preserves_position() {
        let mut rng = GameRng::new(9);
        rng.roll_die();
        rng.roll_die();

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: GameRng = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.seed(), 9);
        assert_eq!(rng.roll_die(), restored.roll_die());
    }

    #[test]
    fn test_scripted_dice() {
        let mut dice = ScriptedDice::new([3, 5]);
        assert_eq!(dice.remaining(), 2);
        assert_eq!(dice.roll_die(), 3);
        assert_eq!(dice.roll_die(), 5);
        assert_eq!(dice.roll_die(), 1);

        let mut sixes = ScriptedDice::always(6);
        assert_eq!(sixes.roll_die(), 6);
        assert_eq!(sixes.roll_die(), 6);
    }
}
