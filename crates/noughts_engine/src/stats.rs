//! Outcome counters that persist across consecutive games.

use super::types::{GameStatus, Mark};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Win/draw counters for a series of games.
///
/// Serialises as `{ xWins, oWins, draws, totalGames }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    x_wins: u32,
    o_wins: u32,
    draws: u32,
    total_games: u32,
}

impl Statistics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a finished game. In-progress statuses are ignored.
    #[instrument(skip(self))]
    pub fn record(&mut self, status: GameStatus) {
        match status {
            GameStatus::InProgress(_) => return,
            GameStatus::Won(Mark::X) => self.x_wins += 1,
            GameStatus::Won(Mark::O) => self.o_wins += 1,
            GameStatus::Draw => self.draws += 1,
        }
        self.total_games += 1;
    }

    /// Wins credited to `mark`.
    pub fn wins_for(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x_wins,
            Mark::O => self.o_wins,
        }
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_terminal_only() {
        let mut stats = Statistics::new();
        stats.record(GameStatus::InProgress(Mark::X));
        assert_eq!(stats, Statistics::new());

        stats.record(GameStatus::Won(Mark::O));
        stats.record(GameStatus::Draw);
        stats.record(GameStatus::Won(Mark::O));
        assert_eq!(stats.wins_for(Mark::O), 2);
        assert_eq!(stats.wins_for(Mark::X), 0);
        assert_eq!(*stats.draws(), 1);
        assert_eq!(*stats.total_games(), 3);
    }

    #[test]
    fn test_wire_field_names() {
        let mut stats = Statistics::new();
        stats.record(GameStatus::Won(Mark::X));
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "xWins": 1, "oWins": 0, "draws": 0, "totalGames": 1 })
        );
    }
}
