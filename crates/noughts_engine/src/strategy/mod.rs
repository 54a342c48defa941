//! Computer opponent move selection.
//!
//! Every strategy is a pure function of the board and the acting mark.
//! Nothing is cached between calls; randomness comes from the caller's RNG.

mod easy;
mod medium;
mod minimax;

pub use easy::random_move;
pub use medium::{critical_move, positional_move};
pub use minimax::{minimax_move, score_position};

use crate::types::{Board, Mark};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Computer difficulty tier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random empty cell.
    Easy,
    /// Win, block, center, corner, side.
    #[default]
    Medium,
    /// Full minimax search.
    Hard,
}

/// Picks a move for `mark` at the given difficulty.
///
/// Returns `None` only when the board has no empty cell.
#[instrument(skip(board, rng))]
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    mark: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<usize> {
    let choice = match difficulty {
        Difficulty::Easy => random_move(board, rng),
        Difficulty::Medium => critical_move(board, mark)
            .or_else(|| critical_move(board, mark.opponent()))
            .or_else(|| positional_move(board, rng)),
        Difficulty::Hard => minimax_move(board, mark),
    };
    debug!(?choice, "Computer chose move");
    choice
}
