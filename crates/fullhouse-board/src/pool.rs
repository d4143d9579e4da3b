//! The per-room draw pool: 1..=75 sampled without replacement.

use rand::Rng;

use crate::MAX_NUMBER;

/// A working pool of uncalled numbers.
///
/// Draws swap-remove a uniformly random element, so each number comes out
/// exactly once and removal never reshifts the tail.
#[derive(Debug, Clone)]
pub struct NumberPool {
    numbers: Vec<u8>,
}

impl NumberPool {
    /// Creates a full pool of 1..=75.
    pub fn new() -> Self {
        Self {
            numbers: (1..=MAX_NUMBER).collect(),
        }
    }

    /// Draws one number uniformly at random, or `None` when exhausted.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u8> {
        if self.numbers.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.numbers.len());
        Some(self.numbers.swap_remove(idx))
    }

    /// How many numbers are left to draw.
    pub fn remaining(&self) -> usize {
        self.numbers.len()
    }

    /// Whether every number has been drawn.
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

impl Default for NumberPool {
    fn default() -> Self {
        Self::new()
    }
}
