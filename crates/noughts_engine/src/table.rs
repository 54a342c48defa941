//! A game plus the statistics of the series it belongs to.

use super::action::MoveError;
use super::game::Game;
use super::stats::Statistics;
use super::types::{GameStatus, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// The state both local and room sessions mutate.
///
/// Board resets and counter resets are independent: [`Table::new_game`]
/// keeps the statistics, [`Table::reset_stats`] keeps the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    game: Game,
    stats: Statistics,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns the series statistics.
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Applies a move and, if it ends the game, records the outcome.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, index: usize, acting: Option<Mark>) -> Result<GameStatus, MoveError> {
        let status = self.game.apply_move(index, acting)?;
        if !status.is_active() {
            self.stats.record(status);
            info!(?status, total_games = self.stats.total_games(), "Game finished");
        }
        Ok(status)
    }

    /// Clears the board, keeping statistics.
    #[instrument(skip(self))]
    pub fn new_game(&mut self) {
        debug!("Starting new game");
        self.game.reset();
    }

    /// Zeroes the statistics, keeping the board.
    #[instrument(skip(self))]
    pub fn reset_stats(&mut self) {
        debug!("Resetting statistics");
        self.stats.reset();
    }

    /// Clears both board and statistics.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
