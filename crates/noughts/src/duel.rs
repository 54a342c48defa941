//! Computer-vs-computer series between two difficulty tiers.

use noughts_engine::{Difficulty, GameStatus, Mark, Statistics, Table, choose_move};
use rand::Rng;
use tracing::{debug, info, instrument};

/// Plays `games` games, X always opening, and returns the tally.
#[instrument(skip(rng))]
pub fn run_duel<R: Rng + ?Sized>(x: Difficulty, o: Difficulty, games: u32, rng: &mut R) -> Statistics {
    let mut table = Table::new();
    for game in 0..games {
        table.new_game();
        while let GameStatus::InProgress(mark) = table.game().status() {
            let difficulty = match mark {
                Mark::X => x,
                Mark::O => o,
            };
            let Some(index) = choose_move(table.game().board(), mark, difficulty, rng) else {
                break;
            };
            if table.apply_move(index, Some(mark)).is_err() {
                break;
            }
        }
        debug!(game, status = ?table.game().status(), "Duel game finished");
    }
    info!(stats = ?table.stats(), "Duel finished");
    *table.stats()
}
