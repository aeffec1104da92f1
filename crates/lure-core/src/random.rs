//! Injected randomness.
//!
//! The catch resolver draws from a [`RandomSource`] passed in through the
//! tick context. Simulations use a seeded [`ChaCha8Rng`]; tests use
//! [`ScriptedRolls`] to pin the exact draws.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Returns the next draw in `[0, 1)`.
    fn next_f32(&mut self) -> f32;
}

impl RandomSource for ChaCha8Rng {
    fn next_f32(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// A fixed sequence of draws.
///
/// Draws are handed out in order and the script wraps around when
/// exhausted. An empty script always yields `0.0`.
///
/// ```
/// use lure_core::random::{RandomSource, ScriptedRolls};
///
/// let mut rolls = ScriptedRolls::new([0.25, 0.75]);
/// assert_eq!(rolls.next_f32(), 0.25);
/// assert_eq!(rolls.next_f32(), 0.75);
/// assert_eq!(rolls.next_f32(), 0.25);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: VecDeque<f32>,
    drawn: usize,
}

impl ScriptedRolls {
    /// Creates a script from the given draws.
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = f32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            drawn: 0,
        }
    }

    /// Appends a draw to the end of the script.
    pub fn push(&mut self, roll: f32) {
        self.rolls.push_back(roll);
    }

    /// Total number of draws handed out so far.
    #[must_use]
    pub const fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RandomSource for ScriptedRolls {
    fn next_f32(&mut self) -> f32 {
        self.drawn += 1;
        match self.rolls.pop_front() {
            Some(roll) => {
                self.rolls.push_back(roll);
                roll
            }
            None => 0.0,
        }
    }
}
