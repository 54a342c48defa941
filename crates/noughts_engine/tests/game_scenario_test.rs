//! End-to-end turn state machine scenarios.

use noughts_engine::{Game, GameStatus, Mark, MoveError, Table, winning_line};

#[test]
fn test_top_row_win_locks_the_game() {
    let mut game = Game::new();
    assert_eq!(game.status(), GameStatus::InProgress(Mark::X));

    for index in [0, 4, 1, 5] {
        assert!(game.apply_move(index, None).unwrap().is_active());
    }
    assert_eq!(game.apply_move(2, None), Ok(GameStatus::Won(Mark::X)));
    assert_eq!(winning_line(game.board()), Some([0, 1, 2]));

    let frozen = game.clone();
    for index in [3, 6, 7, 8] {
        assert_eq!(game.apply_move(index, None), Err(MoveError::GameOver));
        assert_eq!(game.apply_move(index, Some(Mark::O)), Err(MoveError::GameOver));
    }
    assert_eq!(game, frozen);
}

#[test]
fn test_turn_flips_only_while_in_progress() {
    let mut game = Game::new();
    let mut expected = Mark::X;
    for index in [4, 0, 8, 2, 1, 7, 6, 3] {
        assert_eq!(game.current_mark(), expected);
        game.apply_move(index, Some(expected)).unwrap();
        expected = expected.opponent();
    }
    // O X O / O X X / X O X: board full, no line.
    assert_eq!(game.apply_move(5, Some(Mark::X)), Ok(GameStatus::Draw));
    assert_eq!(game.current_mark(), Mark::X);
}

#[test]
fn test_networked_wrong_turn_is_ignored() {
    let mut game = Game::new();
    let before = game.clone();
    assert_eq!(game.apply_move(4, Some(Mark::O)), Err(MoveError::WrongTurn(Mark::O)));
    assert_eq!(game, before);
}

#[test]
fn test_series_statistics() {
    let mut table = Table::new();
    for index in [0, 4, 1, 5, 2] {
        table.apply_move(index, None).unwrap();
    }
    table.new_game();
    for index in [4, 0, 8, 2, 1, 7, 6, 3, 5] {
        table.apply_move(index, None).unwrap();
    }
    let stats = table.stats();
    assert_eq!((*stats.x_wins(), *stats.o_wins(), *stats.draws(), *stats.total_games()), (1, 0, 1, 2));
}
