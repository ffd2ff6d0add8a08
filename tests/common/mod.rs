#![allow(dead_code)]

use rust_janggi_engine::engine::{Board, COLS, Game, ROWS, Side, sq};
use rust_janggi_engine::{Move, RuleConfig};

/// Build a board from a diagram drawn the way the terminal shows it: the first
/// line is row 9 (BLUE's back rank), the last is row 0. `.` marks an empty point,
/// whitespace is ignored.
pub fn board_from_diagram(diagram: &str) -> Board {
    let rows: Vec<Vec<char>> = diagram
        .lines()
        .map(|l| l.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
        .filter(|r| !r.is_empty())
        .collect();
    assert_eq!(rows.len(), ROWS, "diagram needs {} rows", ROWS);

    let mut board = Board::empty();
    for (i, cells) in rows.iter().enumerate() {
        assert_eq!(cells.len(), COLS, "row {} needs {} points", i, COLS);
        let row = ROWS - 1 - i;
        for (col, &c) in cells.iter().enumerate() {
            if c == '.' {
                continue;
            }
            let piece = rust_janggi_engine::Piece::from_char(c)
                .unwrap_or_else(|| panic!("unknown piece code {c:?}"));
            board.set_occupant(sq(row, col), Some(piece));
        }
    }
    board
}

pub fn game_from_diagram(diagram: &str, turn: Side) -> Game {
    Game::from_board(board_from_diagram(diagram), turn, RuleConfig::default())
}

pub fn destinations(moves: &[Move]) -> Vec<usize> {
    let mut to: Vec<usize> = moves.iter().map(|m| m.to).collect();
    to.sort();
    to.dedup();
    to
}
