//! Game rules for tic-tac-toe.
//!
//! Pure functions of board contents: no side effects, no state. Every mode
//! (local play, room sessions, computer strategies) evaluates positions
//! through this module.

pub mod draw;
pub mod win;

pub use draw::{is_full, is_terminal_draw};
pub use win::{WIN_LINES, winner, winning_line};
