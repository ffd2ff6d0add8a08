//! Rules engine for Janggi (Korean chess): board, per-piece move geometry,
//! legality filtering, check and checkmate detection, plus a terminal front end.

pub mod attacks;
pub mod config;
pub mod engine;
pub mod error;
pub mod movegen;
pub mod ui;
pub mod zobrist;

pub use config::{RuleConfig, StalemateRule};
pub use engine::{Board, Game, GameState, Move, Piece, PieceKind, Ply, Side, Sq, sq};
pub use error::{CoordError, MoveError};
