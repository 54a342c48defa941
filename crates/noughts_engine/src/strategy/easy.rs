use crate::types::Board;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Uniformly random empty cell.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    board.empty_cells().choose(rng).copied()
}
