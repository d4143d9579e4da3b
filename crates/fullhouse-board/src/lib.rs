//! Pure bingo logic for Fullhouse: card generation, marked-cell tracking,
//! win detection, and the 1-75 draw pool.
//!
//! Nothing in this crate does I/O or knows about rooms. The room actor
//! drives these types; everything here is deterministic given an RNG.
//!
//! # Key types
//!
//! - [`Card`] — a randomized 5×5 bingo card with a free center cell
//! - [`Marks`] — the parallel marked-cell grid (center pre-marked)
//! - [`has_line`] — row/column/diagonal win detection
//! - [`NumberPool`] — draws 1..=75 without replacement

mod card;
mod pool;
mod win;

pub use card::{Card, Marks, CARD_SIZE, COLUMN_SPAN, FREE_CELL, MAX_NUMBER};
pub use pool::NumberPool;
pub use win::has_line;
