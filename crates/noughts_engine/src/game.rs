//! Turn state machine for tic-tac-toe.

use super::action::MoveError;
use super::rules;
use super::types::{Board, Cell, GameStatus, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Tic-tac-toe game engine.
///
/// Owns the board, the mark to move and the status. The only mutators are
/// [`Game::apply_move`] and [`Game::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    current_mark: Mark,
    status: GameStatus,
    history: Vec<usize>,
}

impl Game {
    /// Creates a new game with X to move.
    pub fn new() -> Self {
        Self::starting_with(Mark::X)
    }

    /// Creates a new game with the given mark to move.
    pub fn starting_with(mark: Mark) -> Self {
        Self {
            board: Board::new(),
            current_mark: mark,
            status: GameStatus::InProgress(mark),
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark to move (or the mark that moved last once the game ends).
    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// True while moves are accepted.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Indices played so far, in order.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Places the current mark at `index`.
    ///
    /// `acting` is the mark of whoever submitted the move. Networked play
    /// passes the participant's mark; local play passes `None` and the mark
    /// to move is implied.
    ///
    /// On success returns the new status. On error nothing has changed.
    #[instrument(skip(self), fields(current = %self.current_mark))]
    pub fn apply_move(&mut self, index: usize, acting: Option<Mark>) -> Result<GameStatus, MoveError> {
        if !self.is_active() {
            return Err(MoveError::GameOver);
        }
        if index >= self.board.cells().len() {
            return Err(MoveError::OutOfBounds(index));
        }
        if let Some(mark) = acting
            && mark != self.current_mark
        {
            return Err(MoveError::WrongTurn(mark));
        }
        if !self.board.is_empty(index) {
            return Err(MoveError::CellOccupied(index));
        }

        let mark = self.current_mark;
        self.board
            .set(index, Cell::Occupied(mark))
            .map_err(|e| MoveError::OutOfBounds(e.index))?;
        self.history.push(index);

        self.status = if let Some(winner) = rules::winner(&self.board) {
            GameStatus::Won(winner)
        } else if rules::is_full(&self.board) {
            GameStatus::Draw
        } else {
            self.current_mark = mark.opponent();
            GameStatus::InProgress(self.current_mark)
        };

        debug!(index, mark = %mark, status = ?self.status, "Move applied");
        Ok(self.status)
    }

    /// Clears the board and restarts with X to move.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
