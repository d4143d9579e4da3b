//! Bingo cards and their marked-cell grids.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Cards are 5×5.
pub const CARD_SIZE: usize = 5;

/// Each column spans 15 consecutive values (B: 1-15, I: 16-30, N: 31-45,
/// G: 46-60, O: 61-75).
pub const COLUMN_SPAN: u8 = 15;

/// The highest callable number.
pub const MAX_NUMBER: u8 = 75;

/// Sentinel value for the free center cell.
pub const FREE_CELL: u8 = 0;

const CENTER: (usize, usize) = (2, 2);

/// A 5×5 bingo card.
///
/// Column `c` holds 5 distinct values from `[15c+1, 15c+15]`; the center
/// cell is the free sentinel. Ranges are disjoint across columns, so a
/// value appears on a card at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card {
    cells: [[u8; CARD_SIZE]; CARD_SIZE],
}

impl Card {
    /// Generates a fresh randomized card.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cells = [[FREE_CELL; CARD_SIZE]; CARD_SIZE];
        for col in 0..CARD_SIZE {
            let base = col as u8 * COLUMN_SPAN + 1;
            // 5 distinct offsets into the column's 15-value range.
            let offsets = index::sample(rng, COLUMN_SPAN as usize, CARD_SIZE);
            for (row, offset) in offsets.into_iter().enumerate() {
                cells[row][col] = base + offset as u8;
            }
        }
        cells[CENTER.0][CENTER.1] = FREE_CELL;
        Self { cells }
    }

    /// Returns the value at `(row, col)`.
    pub fn value(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// Finds the first cell holding `number`, scanning row-major.
    ///
    /// The generator guarantees at most one occurrence, but the scan stops
    /// at the first match regardless.
    pub fn position_of(&self, number: u8) -> Option<(usize, usize)> {
        if number == FREE_CELL {
            return None;
        }
        for row in 0..CARD_SIZE {
            for col in 0..CARD_SIZE {
                if self.cells[row][col] == number {
                    return Some((row, col));
                }
            }
        }
        None
    }
}

/// The marked-cell grid parallel to a [`Card`].
///
/// The free center cell is marked at construction, so any line through it
/// needs only the remaining 4 cells from gameplay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marks {
    cells: [[bool; CARD_SIZE]; CARD_SIZE],
}

impl Marks {
    /// Creates a fresh grid with only the center pre-marked.
    pub fn new() -> Self {
        let mut cells = [[false; CARD_SIZE]; CARD_SIZE];
        cells[CENTER.0][CENTER.1] = true;
        Self { cells }
    }

    /// Marks the cell at `(row, col)`.
    pub fn mark(&mut self, row: usize, col: usize) {
        self.cells[row][col] = true;
    }

    /// Whether the cell at `(row, col)` is marked.
    pub fn is_marked(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }
}

impl Default for Marks {
    fn default() -> Self {
        Self::new()
    }
}
