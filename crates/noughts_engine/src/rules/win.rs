//! Win detection logic for tic-tac-toe.

use crate::types::{Board, Cell, Mark};
use tracing::instrument;

/// The eight winning index-triples: rows, columns, diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the first line fully held by one mark.
#[instrument(level = "trace")]
pub fn winning_line(board: &Board) -> Option<[usize; 3]> {
    let cells = board.cells();
    WIN_LINES.into_iter().find(|&[a, b, c]| {
        cells[a] != Cell::Empty && cells[a] == cells[b] && cells[a] == cells[c]
    })
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` if a mark holds a full line, `None` otherwise.
#[instrument(level = "trace")]
pub fn winner(board: &Board) -> Option<Mark> {
    winning_line(board).and_then(|[a, _, _]| board.cells()[a].mark())
}
