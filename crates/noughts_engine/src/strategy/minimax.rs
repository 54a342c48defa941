//! Exhaustive minimax search.
//!
//! A win for the searching mark scores `10 - depth`, a loss `depth - 10`,
//! a draw `0`. Depth counts moves made since the root position, so faster
//! wins and slower losses score higher. No pruning: the tree from the empty
//! board has under 550k nodes.

use crate::rules;
use crate::types::{Board, Cell, Mark};
use tracing::instrument;

const WIN_SCORE: i32 = 10;

/// Best move for `mark`, or `None` on a full board.
///
/// Ties go to the lowest index.
#[instrument(level = "debug")]
pub fn minimax_move(board: &Board, mark: Mark) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for index in board.empty_cells() {
        let Some(next) = play(board, index, mark) else {
            continue;
        };
        let score = search(&next, mark, mark.opponent(), 1);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

/// Minimax value of `board` for `maximizer` with `to_move` about to play.
pub fn score_position(board: &Board, maximizer: Mark, to_move: Mark) -> i32 {
    search(board, maximizer, to_move, 0)
}

/// Copy of `board` with `mark` placed at `index`.
fn play(board: &Board, index: usize, mark: Mark) -> Option<Board> {
    let mut next = *board;
    next.set(index, Cell::Occupied(mark)).ok()?;
    Some(next)
}

fn search(board: &Board, maximizer: Mark, to_move: Mark, depth: i32) -> i32 {
    if let Some(winner) = rules::winner(board) {
        return if winner == maximizer {
            WIN_SCORE - depth
        } else {
            depth - WIN_SCORE
        };
    }
    if rules::is_full(board) {
        return 0;
    }

    let maximizing = to_move == maximizer;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for index in board.empty_cells() {
        let Some(next) = play(board, index, to_move) else {
            continue;
        };
        let score = search(&next, maximizer, to_move.opponent(), depth + 1);
        best = if maximizing { best.max(score) } else { best.min(score) };
    }
    best
}
