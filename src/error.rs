use crate::engine::{GameState, Piece, Side};

/// `(row, col)` of a board point.
pub type Coord = (usize, usize);

/// Why a move or pass request was refused. The game is unchanged after any of these.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("game is over ({0})")]
    GameOver(GameState),
    #[error("origin and destination are the same point")]
    NullMove,
    #[error("no piece at {0:?}")]
    EmptySquare(Coord),
    #[error("piece at {at:?} does not belong to {side}")]
    WrongSide { at: Coord, side: Side },
    #[error("{piece} cannot move from {from:?} to {to:?}")]
    Illegal { piece: Piece, from: Coord, to: Coord },
    #[error("passing is disabled")]
    PassDisabled,
    #[error("{0} cannot pass while in check")]
    PassInCheck(Side),
}

/// Malformed algebraic square such as `j4` or `a11`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    #[error("empty square name")]
    Empty,
    #[error("bad column {0:?}, expected a-i")]
    BadColumn(char),
    #[error("bad row {0:?}, expected 1-10")]
    BadRow(String),
}

/// A terminal command that could not be understood.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Coord(#[from] CoordError),
    #[error("unknown command {0:?}, type 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}
