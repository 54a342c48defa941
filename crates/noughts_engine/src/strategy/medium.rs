//! Rule-cascade strategy: complete a line, block a line, then positional play.

use crate::position::Position;
use crate::rules::WIN_LINES;
use crate::types::{Board, Cell, Mark};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Finds a cell that would complete a line for `mark`.
///
/// Scans the win lines in table order for one holding exactly two of
/// `mark` and one empty cell, and returns that empty cell.
pub fn critical_move(board: &Board, mark: Mark) -> Option<usize> {
    let cells = board.cells();
    WIN_LINES.iter().find_map(|line| {
        let held = line
            .iter()
            .filter(|&&i| cells[i] == Cell::Occupied(mark))
            .count();
        let mut empty = line.iter().copied().filter(|&i| cells[i] == Cell::Empty);
        match (held, empty.next(), empty.next()) {
            (2, Some(i), None) => Some(i),
            _ => None,
        }
    })
}

/// Center, else a random empty corner, else a random empty side.
pub fn positional_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    if board.is_empty(Position::Center.to_index()) {
        return Some(Position::Center.to_index());
    }
    random_free(board, &Position::CORNERS, rng).or_else(|| random_free(board, &Position::SIDES, rng))
}

fn random_free<R: Rng + ?Sized>(board: &Board, group: &[Position], rng: &mut R) -> Option<usize> {
    let free: Vec<usize> = group
        .iter()
        .map(|p| p.to_index())
        .filter(|&i| board.is_empty(i))
        .collect();
    free.choose(rng).copied()
}
