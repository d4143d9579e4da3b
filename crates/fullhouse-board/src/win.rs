//! Win detection over a marked-cell grid.

use crate::{Marks, CARD_SIZE};

/// Returns `true` iff any row, any column, or either diagonal is fully
/// marked.
///
/// Pure and O(25). The free center is pre-marked, so lines through it need
/// only 4 marked cells from gameplay.
pub fn has_line(marks: &Marks) -> bool {
    let full_row = (0..CARD_SIZE).any(|r| (0..CARD_SIZE).all(|c| marks.is_marked(r, c)));
    let full_col = (0..CARD_SIZE).any(|c| (0..CARD_SIZE).all(|r| marks.is_marked(r, c)));
    let diagonal = (0..CARD_SIZE).all(|i| marks.is_marked(i, i));
    let anti_diagonal = (0..CARD_SIZE).all(|i| marks.is_marked(i, CARD_SIZE - 1 - i));
    full_row || full_col || diagonal || anti_diagonal
}
