//! Exhaustive checks of the rules evaluator.

use noughts_engine::{Board, Cell, Mark, WIN_LINES, is_full, is_terminal_draw, winner};

/// Decodes a base-3 number into a board (0 = empty, 1 = X, 2 = O).
fn board_from_code(mut code: u32) -> Board {
    let mut board = Board::new();
    for i in 0..9 {
        let cell = match code % 3 {
            1 => Cell::Occupied(Mark::X),
            2 => Cell::Occupied(Mark::O),
            _ => Cell::Empty,
        };
        board.set(i, cell).unwrap();
        code /= 3;
    }
    board
}

fn line_owner(board: &Board, line: [usize; 3]) -> Option<Mark> {
    let cells = board.cells();
    match cells[line[0]] {
        Cell::Occupied(m) if cells[line[1]] == cells[line[0]] && cells[line[2]] == cells[line[0]] => Some(m),
        _ => None,
    }
}

#[test]
fn test_winner_matches_line_scan_on_every_board() {
    for code in 0..3u32.pow(9) {
        let board = board_from_code(code);
        let owners: Vec<Mark> = WIN_LINES
            .iter()
            .filter_map(|&line| line_owner(&board, line))
            .collect();

        match winner(&board) {
            Some(mark) => assert!(owners.contains(&mark), "code {code}: {mark} has no full line"),
            None => assert!(owners.is_empty(), "code {code}: missed a full line"),
        }
    }
}

#[test]
fn test_draw_iff_full_and_no_winner() {
    for code in 0..3u32.pow(9) {
        let board = board_from_code(code);
        assert_eq!(
            is_terminal_draw(&board),
            is_full(&board) && winner(&board).is_none(),
            "code {code}"
        );
    }
}

#[test]
fn test_documented_draw_board() {
    use Mark::{O, X};
    let marks = [X, O, X, X, O, O, O, X, X];
    let board = Board::from_cells(marks.map(Cell::Occupied));
    assert_eq!(winner(&board), None);
    assert!(is_terminal_draw(&board));
}
