//! Noughts engine - authoritative tic-tac-toe rules and computer opponents.
//!
//! # Architecture
//!
//! - **Types**: [`Board`], [`Cell`], [`Mark`], [`GameStatus`]
//! - **Rules**: pure win/draw evaluation over the [`WIN_LINES`] table
//! - **Game**: the turn state machine; illegal moves change nothing
//! - **Table**: a game plus series [`Statistics`]
//! - **Strategy**: easy/medium/hard move selection, hard being minimax
//! - **Local**: an offline session driving PvP or PvC play
//!
//! # Example
//!
//! ```
//! use noughts_engine::{Game, GameStatus, Mark};
//!
//! let mut game = Game::new();
//! for index in [0, 4, 1, 5] {
//!     game.apply_move(index, None).unwrap();
//! }
//! assert_eq!(game.apply_move(2, None), Ok(GameStatus::Won(Mark::X)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
mod local;
mod position;
pub mod rules;
mod stats;
pub mod strategy;
mod table;
mod types;

pub use action::{Move, MoveError};
pub use game::Game;
pub use local::{LocalSession, LocalSnapshot, Mode};
pub use position::Position;
pub use rules::{WIN_LINES, is_full, is_terminal_draw, winner, winning_line};
pub use stats::Statistics;
pub use strategy::{Difficulty, choose_move};
pub use table::Table;
pub use types::{Board, BoardError, CELL_COUNT, Cell, GameStatus, Mark};
