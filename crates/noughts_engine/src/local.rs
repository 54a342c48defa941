//! Client-side session for offline play.

use super::action::MoveError;
use super::stats::Statistics;
use super::strategy::{Difficulty, choose_move};
use super::table::Table;
use super::types::{Board, GameStatus, Mark};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// How a local session is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Two humans alternate on one device.
    PlayerVsPlayer,
    /// A human plays the computer.
    PlayerVsComputer {
        /// Computer strength.
        difficulty: Difficulty,
        /// The human's mark. X always opens, so `O` lets the computer start.
        human_mark: Mark,
    },
}

impl Mode {
    /// The computer's mark, if the computer plays.
    pub fn computer_mark(&self) -> Option<Mark> {
        match self {
            Mode::PlayerVsPlayer => None,
            Mode::PlayerVsComputer { human_mark, .. } => Some(human_mark.opponent()),
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::PlayerVsComputer {
            difficulty: Difficulty::default(),
            human_mark: Mark::X,
        }
    }
}

/// What a front end needs to paint after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSnapshot {
    /// Board contents.
    pub board: Board,
    /// Game status.
    pub status: GameStatus,
    /// Series statistics.
    pub stats: Statistics,
    /// Mode in effect.
    pub mode: Mode,
}

/// One offline game series (one per browser tab, terminal, etc.).
#[derive(Debug, Clone, Default)]
pub struct LocalSession {
    mode: Mode,
    table: Table,
}

impl LocalSession {
    /// Creates a session in the given mode.
    #[instrument]
    pub fn new(mode: Mode) -> Self {
        info!(?mode, "Creating local session");
        Self {
            mode,
            table: Table::new(),
        }
    }

    /// Returns the mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// True when the computer should move next.
    pub fn is_computer_turn(&self) -> bool {
        self.table.game().is_active()
            && self.mode.computer_mark() == Some(self.table.game().current_mark())
    }

    /// Applies a human move.
    ///
    /// `acting` may name the mover; `None` means "whoever is to move". In PvC
    /// mode the computer's turn is refused, so a human cannot play for it.
    /// Rejected moves leave the session unchanged.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, index: usize, acting: Option<Mark>) -> Result<LocalSnapshot, MoveError> {
        if self.is_computer_turn() {
            return Err(MoveError::WrongTurn(
                acting.unwrap_or(self.table.game().current_mark()),
            ));
        }
        self.table.apply_move(index, acting).inspect_err(|e| {
            debug!(index, error = %e, "Ignoring move");
        })?;
        Ok(self.snapshot())
    }

    /// Lets the computer move if it is its turn. Returns the chosen index.
    #[instrument(skip(self, rng))]
    pub fn computer_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if !self.is_computer_turn() {
            return None;
        }
        let Mode::PlayerVsComputer { difficulty, .. } = self.mode else {
            return None;
        };
        let mark = self.table.game().current_mark();
        let index = choose_move(self.table.game().board(), mark, difficulty, rng)?;
        self.table.apply_move(index, Some(mark)).ok()?;
        Some(index)
    }

    /// Starts a new game, keeping statistics.
    pub fn new_game(&mut self) -> LocalSnapshot {
        self.table.new_game();
        self.snapshot()
    }

    /// Zeroes statistics, keeping the board.
    pub fn reset_stats(&mut self) -> LocalSnapshot {
        self.table.reset_stats();
        self.snapshot()
    }

    /// Switches mode. Board and statistics are cleared.
    #[instrument(skip(self))]
    pub fn set_mode(&mut self, mode: Mode) -> LocalSnapshot {
        info!(?mode, "Switching mode");
        self.mode = mode;
        self.table.clear();
        self.snapshot()
    }

    /// Current state for rendering.
    pub fn snapshot(&self) -> LocalSnapshot {
        LocalSnapshot {
            board: *self.table.game().board(),
            status: self.table.game().status(),
            stats: *self.table.stats(),
            mode: self.mode,
        }
    }
}
