//! Per-piece move geometry.
//!
//! Every rule is a pure function of a board, an origin square and the side that
//! owns the piece, and returns its own list of candidate moves. Rules apply
//! geometry only; moves that leave the mover's general attacked are removed
//! later by [`Game::legal_moves`](crate::engine::Game::legal_moves).

use crate::attacks::AttackMap;
use crate::engine::{Board, Move, Piece, PieceKind, Side, Sq, col_of, offset, row_of};
use std::iter::successors;
use std::ops::RangeInclusive;

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

// =====================
// Palaces
// =====================
pub const PALACE_COLS: RangeInclusive<usize> = 3..=5;

pub fn palace_rows(side: Side) -> RangeInclusive<usize> {
    match side {
        Side::Red => 0..=2,
        Side::Blue => 7..=9,
    }
}

pub fn in_palace(s: Sq, side: Side) -> bool {
    palace_rows(side).contains(&row_of(s)) && PALACE_COLS.contains(&col_of(s))
}

/// The palace containing `s`, if any.
pub fn palace_of(s: Sq) -> Option<Side> {
    [Side::Red, Side::Blue]
        .into_iter()
        .find(|&side| in_palace(s, side))
}

/// Corners and centre of a palace: the five points joined by its diagonals.
pub fn is_palace_diagonal_point(s: Sq) -> bool {
    match palace_of(s) {
        Some(side) => {
            let r = row_of(s) - palace_rows(side).start();
            let c = col_of(s) - PALACE_COLS.start();
            (r + c) % 2 == 0
        }
        None => false,
    }
}

/// One step along a palace diagonal, staying inside the same palace.
fn palace_diagonal_step(from: Sq, (dr, dc): (i32, i32)) -> Option<Sq> {
    let palace = palace_of(from)?;
    if !is_palace_diagonal_point(from) {
        return None;
    }
    let to = offset(from, dr, dc)?;
    (palace_of(to) == Some(palace) && is_palace_diagonal_point(to)).then_some(to)
}

// =====================
// Paths
// =====================
fn ray(from: Sq, (dr, dc): (i32, i32)) -> impl Iterator<Item = Sq> {
    successors(offset(from, dr, dc), move |&s| offset(s, dr, dc))
}

fn palace_ray(from: Sq, dir: (i32, i32)) -> impl Iterator<Item = Sq> {
    successors(palace_diagonal_step(from, dir), move |&s| palace_diagonal_step(s, dir))
}

/// The two diagonals that continue away from the origin after an orthogonal step.
fn outward((dr, dc): (i32, i32)) -> [(i32, i32); 2] {
    if dr != 0 {
        [(dr, -1), (dr, 1)]
    } else {
        [(-1, dc), (1, dc)]
    }
}

/// A move to `to` unless a friendly piece sits there.
fn step(board: &Board, from: Sq, to: Sq, piece: Piece) -> Option<Move> {
    match board.occupant(to) {
        Some(target) if !target.is_enemy_of(piece.side) => None,
        target => Some(Move::new(from, to, piece, target)),
    }
}

/// Walk `path` until blocked; the first enemy met is capturable.
fn slide(board: &Board, from: Sq, piece: Piece, path: impl Iterator<Item = Sq>) -> Vec<Move> {
    let mut moves = Vec::new();
    for to in path {
        match board.occupant(to) {
            None => moves.push(Move::new(from, to, piece, None)),
            Some(target) => {
                if target.is_enemy_of(piece.side) {
                    moves.push(Move::new(from, to, piece, Some(target)));
                }
                break;
            }
        }
    }
    moves
}

/// Cannon movement along `path`: jump the first piece met (which may not be a
/// cannon), then land on empty points or on the first non-cannon enemy.
fn jump(board: &Board, from: Sq, piece: Piece, path: impl Iterator<Item = Sq>) -> Vec<Move> {
    let mut path = path.skip_while(|&s| board.is_empty(s));
    match path.next().and_then(|screen| board.occupant(screen)) {
        Some(screen) if screen.kind != PieceKind::Cannon => {}
        _ => return Vec::new(),
    }
    let mut moves = Vec::new();
    for to in path {
        match board.occupant(to) {
            None => moves.push(Move::new(from, to, piece, None)),
            Some(target) => {
                if target.is_enemy_of(piece.side) && target.kind != PieceKind::Cannon {
                    moves.push(Move::new(from, to, piece, Some(target)));
                }
                break;
            }
        }
    }
    moves
}

// =====================
// Piece Rules
// =====================

/// Forward or sideways one point; forward along palace diagonals inside a palace.
pub fn soldier_moves(board: &Board, from: Sq, side: Side) -> Vec<Move> {
    let piece = Piece::new(side, PieceKind::Soldier);
    let fwd = side.forward();
    let straight = [(fwd, 0), (0, -1), (0, 1)]
        .into_iter()
        .filter_map(|(dr, dc)| offset(from, dr, dc));
    let diagonal = [(fwd, -1), (fwd, 1)]
        .into_iter()
        .filter_map(|dir| palace_diagonal_step(from, dir));
    straight
        .chain(diagonal)
        .filter_map(|to| step(board, from, to, piece))
        .collect()
}

pub fn chariot_moves(board: &Board, from: Sq, side: Side) -> Vec<Move> {
    let piece = Piece::new(side, PieceKind::Chariot);
    let orthogonal = ORTHOGONAL
        .into_iter()
        .flat_map(|dir| slide(board, from, piece, ray(from, dir)));
    let diagonal = DIAGONAL
        .into_iter()
        .flat_map(|dir| slide(board, from, piece, palace_ray(from, dir)));
    orthogonal.chain(diagonal).collect()
}

pub fn cannon_moves(board: &Board, from: Sq, side: Side) -> Vec<Move> {
    let piece = Piece::new(side, PieceKind::Cannon);
    let orthogonal = ORTHOGONAL
        .into_iter()
        .flat_map(|dir| jump(board, from, piece, ray(from, dir)));
    let diagonal = DIAGONAL
        .into_iter()
        .flat_map(|dir| jump(board, from, piece, palace_ray(from, dir)));
    orthogonal.chain(diagonal).collect()
}

/// One point orthogonally (must be empty), then one point diagonally outward.
pub fn horse_moves(board: &Board, from: Sq, side: Side) -> Vec<Move> {
    let piece = Piece::new(side, PieceKind::Horse);
    ORTHOGONAL
        .into_iter()
        .filter_map(|dir| {
            offset(from, dir.0, dir.1)
                .filter(|&leg| board.is_empty(leg))
                .map(|leg| (leg, dir))
        })
        .flat_map(|(leg, dir)| {
            outward(dir)
                .into_iter()
                .filter_map(move |(dr, dc)| offset(leg, dr, dc))
        })
        .filter_map(|to| step(board, from, to, piece))
        .collect()
}

/// One point orthogonally, then two diagonally outward; both intermediate points must be empty.
pub fn elephant_moves(board: &Board, from: Sq, side: Side) -> Vec<Move> {
    let piece = Piece::new(side, PieceKind::Elephant);
    let mut moves = Vec::new();
    for dir in ORTHOGONAL {
        let Some(leg) = offset(from, dir.0, dir.1) else {
            continue;
        };
        if !board.is_empty(leg) {
            continue;
        }
        for (dr, dc) in outward(dir) {
            let Some(mid) = offset(leg, dr, dc) else {
                continue;
            };
            if !board.is_empty(mid) {
                continue;
            }
            if let Some(mv) = offset(mid, dr, dc).and_then(|to| step(board, from, to, piece)) {
                moves.push(mv);
            }
        }
    }
    moves
}

// guards and generals share the palace-bound step
fn palace_moves(board: &Board, from: Sq, piece: Piece) -> Vec<Move> {
    let home = piece.side;
    let orthogonal = ORTHOGONAL
        .into_iter()
        .filter_map(|(dr, dc)| offset(from, dr, dc));
    let diagonal = DIAGONAL
        .into_iter()
        .filter_map(|dir| palace_diagonal_step(from, dir));
    orthogonal
        .chain(diagonal)
        .filter(|&to| in_palace(to, home))
        .filter_map(|to| step(board, from, to, piece))
        .collect()
}

pub fn guard_moves(board: &Board, from: Sq, side: Side) -> Vec<Move> {
    palace_moves(board, from, Piece::new(side, PieceKind::Guard))
}

pub fn general_moves(board: &Board, from: Sq, side: Side) -> Vec<Move> {
    palace_moves(board, from, Piece::new(side, PieceKind::General))
}

// =====================
// Whole-board Generation
// =====================

/// Candidate moves of whatever piece stands on `from`.
pub fn piece_moves(board: &Board, from: Sq) -> Vec<Move> {
    let Some(piece) = board.occupant(from) else {
        return Vec::new();
    };
    let rule: fn(&Board, Sq, Side) -> Vec<Move> = match piece.kind {
        PieceKind::Soldier => soldier_moves,
        PieceKind::Chariot => chariot_moves,
        PieceKind::Cannon => cannon_moves,
        PieceKind::Horse => horse_moves,
        PieceKind::Elephant => elephant_moves,
        PieceKind::Guard => guard_moves,
        PieceKind::General => general_moves,
    };
    rule(board, from, piece.side)
}

/// All pseudo moves of `side`, scanning the board row by row from row 0.
pub fn pseudo_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .pieces(side)
        .flat_map(|(from, _)| piece_moves(board, from))
        .collect()
}

/// Every square a pseudo move of `attacker` lands on.
pub fn attacked_squares(board: &Board, attacker: Side) -> AttackMap {
    pseudo_moves(board, attacker).iter().map(|mv| mv.to).collect()
}

/// Uncached check test.
pub fn is_in_check(board: &Board, side: Side) -> bool {
    board
        .find_general(side)
        .is_some_and(|general| attacked_squares(board, side.opponent()).contains(general))
}
