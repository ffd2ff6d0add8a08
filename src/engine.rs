// Features:
// - 10x9 board of side/kind piece descriptors
// - Move snapshots and ply history with undo
// - Legality filter: simulate, test for check, revert
// - Checkmate detection and turn alternation
// - Incremental Zobrist board key feeding the attack cache

use crate::attacks::{AttackCache, AttackMap};
use crate::config::{RuleConfig, StalemateRule};
use crate::error::{Coord, MoveError};
use crate::movegen;
use crate::zobrist::Zobrist;
use std::fmt;

// =====================
// Board Geometry
// =====================
pub type Sq = usize; // row * COLS + col
pub const ROWS: usize = 10;
pub const COLS: usize = 9;
pub const NUM_SQUARES: usize = ROWS * COLS;

pub const fn sq(row: usize, col: usize) -> Sq {
    row * COLS + col
}
pub const fn row_of(s: Sq) -> usize {
    s / COLS
}
pub const fn col_of(s: Sq) -> usize {
    s % COLS
}
pub const fn coords(s: Sq) -> Coord {
    (row_of(s), col_of(s))
}

/// Step from `s` by a row/column delta, or `None` when that leaves the board.
pub fn offset(s: Sq, dr: i32, dc: i32) -> Option<Sq> {
    let r = row_of(s) as i32 + dr;
    let c = col_of(s) as i32 + dc;
    if (0..ROWS as i32).contains(&r) && (0..COLS as i32).contains(&c) {
        Some(sq(r as usize, c as usize))
    } else {
        None
    }
}

// =====================
// Pieces
// =====================
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }
    pub fn index(self) -> usize {
        self as usize
    }
    /// Row direction this side's soldiers advance in.
    pub fn forward(self) -> i32 {
        match self {
            Side::Red => 1,
            Side::Blue => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "RED"),
            Side::Blue => write!(f, "BLUE"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum PieceKind {
    Soldier,
    Chariot,
    Cannon,
    Horse,
    Elephant,
    Guard,
    General,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Soldier,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Horse,
        PieceKind::Elephant,
        PieceKind::Guard,
        PieceKind::General,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Soldier => 'P',
            PieceKind::Chariot => 'R',
            PieceKind::Cannon => 'C',
            PieceKind::Horse => 'H',
            PieceKind::Elephant => 'E',
            PieceKind::Guard => 'A',
            PieceKind::General => 'K',
        }
    }
    pub fn from_char(c: char) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.to_char() == c.to_ascii_uppercase())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(side: Side, kind: PieceKind) -> Piece {
        Piece { side, kind }
    }
    /// RED pieces print upper case, BLUE lower case.
    pub fn to_char(self) -> char {
        let c = self.kind.to_char();
        match self.side {
            Side::Red => c,
            Side::Blue => c.to_ascii_lowercase(),
        }
    }
    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let side = if c.is_ascii_uppercase() {
            Side::Red
        } else {
            Side::Blue
        };
        Some(Piece::new(side, kind))
    }
    pub fn is_enemy_of(self, side: Side) -> bool {
        self.side != side
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// =====================
// Board
// =====================
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    cells: [Option<Piece>; NUM_SQUARES],
}

const BACK_RANK: [Option<PieceKind>; COLS] = [
    Some(PieceKind::Chariot),
    Some(PieceKind::Elephant),
    Some(PieceKind::Horse),
    Some(PieceKind::Guard),
    None,
    Some(PieceKind::Guard),
    Some(PieceKind::Elephant),
    Some(PieceKind::Horse),
    Some(PieceKind::Chariot),
];

impl Board {
    pub fn empty() -> Board {
        Board {
            cells: [None; NUM_SQUARES],
        }
    }

    /// Opening layout: RED on rows 0-3, BLUE mirrored on rows 6-9.
    pub fn initial() -> Board {
        let mut b = Board::empty();
        for (side, back, general, cannons, soldiers) in [(Side::Red, 0, 1, 2, 3), (Side::Blue, 9, 8, 7, 6)] {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                if let Some(kind) = kind {
                    b.cells[sq(back, col)] = Some(Piece::new(side, *kind));
                }
            }
            b.cells[sq(general, 4)] = Some(Piece::new(side, PieceKind::General));
            for col in [1, 7] {
                b.cells[sq(cannons, col)] = Some(Piece::new(side, PieceKind::Cannon));
            }
            for col in (0..COLS).step_by(2) {
                b.cells[sq(soldiers, col)] = Some(Piece::new(side, PieceKind::Soldier));
            }
        }
        b
    }

    pub fn occupant(&self, s: Sq) -> Option<Piece> {
        self.cells[s]
    }
    pub fn set_occupant(&mut self, s: Sq, cell: Option<Piece>) {
        self.cells[s] = cell
    }
    pub fn is_empty(&self, s: Sq) -> bool {
        self.cells[s].is_none()
    }

    /// Squares owned by `side`, in row-major order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Sq, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(s, cell)| cell.filter(|p| p.side == side).map(|p| (s, p)))
    }

    pub fn find_general(&self, side: Side) -> Option<Sq> {
        self.pieces(side)
            .find(|(_, p)| p.kind == PieceKind::General)
            .map(|(s, _)| s)
    }

    /// Left-right reflection across the palace axis.
    pub fn mirrored(&self) -> Board {
        let mut b = Board::empty();
        for s in 0..NUM_SQUARES {
            b.cells[sq(row_of(s), COLS - 1 - col_of(s))] = self.cells[s];
        }
        b
    }

    fn commit(&mut self, mv: &Move) {
        self.cells[mv.from] = None;
        self.cells[mv.to] = Some(mv.piece);
    }

    fn revert(&mut self, mv: &Move) {
        self.cells[mv.from] = Some(mv.piece);
        self.cells[mv.to] = mv.captured;
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            write!(f, "{:>2} ", row)?;
            for col in 0..COLS {
                let c = self.cells[sq(row, col)].map_or('.', Piece::to_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "    0 1 2 3 4 5 6 7 8")
    }
}

// =====================
// Move Representation
// =====================

/// Snapshot of a move: both cells as they were when the move was generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Sq,
    pub to: Sq,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl Move {
    pub const fn new(from: Sq, to: Sq, piece: Piece, captured: Option<Piece>) -> Move {
        Move {
            from,
            to,
            piece,
            captured,
        }
    }

    /// Record the current contents of `from` and `to`; `None` if `from` is empty.
    pub fn snapshot(board: &Board, from: Sq, to: Sq) -> Option<Move> {
        let piece = board.occupant(from)?;
        Some(Move::new(from, to, piece, board.occupant(to)))
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fr, fc) = coords(self.from);
        let (tr, tc) = coords(self.to);
        write!(f, "{} {},{}-{},{}", self.piece, fr, fc, tr, tc)?;
        if let Some(cap) = self.captured {
            write!(f, " x{}", cap)?;
        }
        Ok(())
    }
}

/// One entry of the game record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ply {
    Move(Move),
    Pass(Side),
}

impl Ply {
    pub fn mover(&self) -> Side {
        match self {
            Ply::Move(mv) => mv.piece.side,
            Ply::Pass(side) => *side,
        }
    }
    pub fn as_move(&self) -> Option<&Move> {
        match self {
            Ply::Move(mv) => Some(mv),
            Ply::Pass(_) => None,
        }
    }
}

// =====================
// Game State
// =====================
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GameState {
    Unfinished,
    RedWon,
    BlueWon,
    Draw,
}

impl GameState {
    pub fn won_by(side: Side) -> GameState {
        match side {
            Side::Red => GameState::RedWon,
            Side::Blue => GameState::BlueWon,
        }
    }
    pub fn is_terminal(self) -> bool {
        self != GameState::Unfinished
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameState::Unfinished => "UNFINISHED",
            GameState::RedWon => "RED_WON",
            GameState::BlueWon => "BLUE_WON",
            GameState::Draw => "DRAW",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy)]
struct Undo {
    ply: Ply,
    prev_state: GameState,
    prev_checks: [bool; 2],
}

/// A game in progress: board, side to move, history and result.
///
/// Every operation runs to completion before returning, and the board is only
/// ever observed in a committed position. Hosts sharing a game across threads
/// wrap the whole value in one lock.
#[derive(Clone)]
pub struct Game {
    board: Board,
    turn: Side,
    history: Vec<Undo>,
    state: GameState,
    checks: [bool; 2],
    config: RuleConfig,
    zobrist: Zobrist,
    board_key: u64,
    cache: Option<AttackCache>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    pub fn new() -> Game {
        Game::with_config(RuleConfig::default())
    }

    pub fn with_config(config: RuleConfig) -> Game {
        Game::from_board(Board::initial(), Side::Red, config)
    }

    /// Start from an arbitrary position. The board should hold one general per side.
    pub fn from_board(board: Board, turn: Side, config: RuleConfig) -> Game {
        let zobrist = Zobrist::with_seed(config.zobrist_seed);
        let board_key = zobrist.hash_board(&board);
        let cache = (config.attack_cache_buckets > 0)
            .then(|| AttackCache::new_buckets(config.attack_cache_buckets));
        let mut game = Game {
            board,
            turn,
            history: Vec::new(),
            state: GameState::Unfinished,
            checks: [false; 2],
            config,
            zobrist,
            board_key,
            cache,
        };
        game.refresh_checks();
        game
    }

    pub fn reset(&mut self) {
        self.board = Board::initial();
        self.turn = Side::Red;
        self.history.clear();
        self.state = GameState::Unfinished;
        self.board_key = self.zobrist.hash_board(&self.board);
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
        self.refresh_checks();
        log::info!("game reset");
    }

    // ---------------------
    // Queries
    // ---------------------
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }
    pub fn turn(&self) -> Side {
        self.turn
    }
    pub fn state(&self) -> GameState {
        self.state
    }
    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }
    pub fn history(&self) -> Vec<Ply> {
        self.history.iter().map(|u| u.ply).collect()
    }
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
    /// The most recent ply if it moved a piece (passes have nothing to replay).
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().and_then(|u| u.ply.as_move().copied())
    }
    /// In-check flag for `side` as of the last ply.
    pub fn check_flag(&self, side: Side) -> bool {
        self.checks[side.index()]
    }
    /// Zobrist key of the board plus the side to move.
    pub fn position_key(&self) -> u64 {
        self.board_key ^ self.zobrist.side_key(self.turn)
    }
    pub fn cache_stats(&self) -> Option<String> {
        self.cache.as_ref().map(AttackCache::stats)
    }

    // ---------------------
    // Cell access
    // ---------------------
    pub fn occupant(&self, s: Sq) -> Option<Piece> {
        self.board.occupant(s)
    }

    pub fn set_occupant(&mut self, s: Sq, cell: Option<Piece>) {
        if let Some(old) = self.board.occupant(s) {
            self.board_key = self.zobrist.toggle_piece(self.board_key, s, old);
        }
        if let Some(new) = cell {
            self.board_key = self.zobrist.toggle_piece(self.board_key, s, new);
        }
        self.board.set_occupant(s, cell);
    }

    /// Flip the side to move. Each call flips exactly once.
    pub fn toggle_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    // ---------------------
    // Applying and undoing plies
    // ---------------------

    /// Commit `mv` without checking it against the legal-move list, then
    /// evaluate the side now to move for checkmate.
    ///
    /// `mv` must be a snapshot of the current board. Returns `false` and leaves
    /// everything untouched once the game is over.
    pub fn apply_move(&mut self, mv: Move) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.push_ply(Ply::Move(mv));
        log::debug!("{} played {}", mv.piece.side, mv);
        self.after_ply();
        true
    }

    pub fn make_move(&mut self, from: Sq, to: Sq) -> bool {
        match self.try_make_move(from, to) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("rejected {:?} -> {:?}: {}", coords(from), coords(to), err);
                false
            }
        }
    }

    /// Play `from -> to` if it is one of the side to move's legal moves.
    pub fn try_make_move(&mut self, from: Sq, to: Sq) -> Result<Move, MoveError> {
        if self.state.is_terminal() {
            return Err(MoveError::GameOver(self.state));
        }
        if from == to {
            return Err(MoveError::NullMove);
        }
        let piece = self
            .board
            .occupant(from)
            .ok_or(MoveError::EmptySquare(coords(from)))?;
        if piece.side != self.turn {
            return Err(MoveError::WrongSide {
                at: coords(from),
                side: self.turn,
            });
        }
        let mv = self
            .legal_moves_from(from)
            .into_iter()
            .find(|mv| mv.to == to)
            .ok_or(MoveError::Illegal {
                piece,
                from: coords(from),
                to: coords(to),
            })?;
        self.apply_move(mv);
        Ok(mv)
    }

    pub fn pass_turn(&mut self) -> bool {
        match self.try_pass() {
            Ok(()) => true,
            Err(err) => {
                log::debug!("rejected pass: {}", err);
                false
            }
        }
    }

    /// Give up the turn without moving. Not allowed while in check.
    pub fn try_pass(&mut self) -> Result<(), MoveError> {
        if self.state.is_terminal() {
            return Err(MoveError::GameOver(self.state));
        }
        if !self.config.allow_pass {
            return Err(MoveError::PassDisabled);
        }
        let side = self.turn;
        if self.is_in_check(side) {
            return Err(MoveError::PassInCheck(side));
        }
        self.push_ply(Ply::Pass(side));
        log::debug!("{} passed", side);
        self.after_ply();
        Ok(())
    }

    /// Revert the most recent ply. Does nothing on an empty history.
    pub fn undo(&mut self) {
        let Some(entry) = self.history.pop() else {
            return;
        };
        if let Ply::Move(mv) = entry.ply {
            self.revert(&mv);
        }
        self.toggle_turn();
        self.state = entry.prev_state;
        self.checks = entry.prev_checks;
        log::debug!("undid {:?}", entry.ply);
    }

    pub fn undo_move(&mut self) {
        self.undo()
    }

    fn push_ply(&mut self, ply: Ply) {
        self.history.push(Undo {
            ply,
            prev_state: self.state,
            prev_checks: self.checks,
        });
        if let Ply::Move(mv) = ply {
            self.commit(&mv);
        }
        self.toggle_turn();
    }

    fn commit(&mut self, mv: &Move) {
        self.board.commit(mv);
        self.board_key = self.zobrist.update_move(self.board_key, mv);
    }

    fn revert(&mut self, mv: &Move) {
        self.board.revert(mv);
        // XOR updates are their own inverse
        self.board_key = self.zobrist.update_move(self.board_key, mv);
    }

    /// Refresh the check flags and decide whether the side now to move is mated.
    fn after_ply(&mut self) {
        self.refresh_checks();
        let side = self.turn;
        if !self.current_legal_moves().is_empty() {
            return;
        }
        if self.checks[side.index()] {
            self.state = GameState::won_by(side.opponent());
            log::info!("checkmate: {} wins", side.opponent());
            return;
        }
        match self.config.stalemate {
            StalemateRule::Continue => {
                log::info!("{} has no legal move and is not in check; play continues", side)
            }
            StalemateRule::Draw => {
                self.state = GameState::Draw;
                log::info!("{} is stalemated: draw", side);
            }
        }
    }

    fn refresh_checks(&mut self) {
        for side in [Side::Red, Side::Blue] {
            self.checks[side.index()] = self.is_in_check(side);
        }
    }

    // ---------------------
    // Move generation and legality
    // ---------------------
    pub fn pseudo_moves(&self, side: Side) -> Vec<Move> {
        movegen::pseudo_moves(&self.board, side)
    }

    /// Pseudo moves of `side` that do not leave its general attacked.
    pub fn legal_moves(&mut self, side: Side) -> Vec<Move> {
        let pseudo = self.pseudo_moves(side);
        let total = pseudo.len();
        let legal: Vec<Move> = pseudo
            .into_iter()
            .filter(|mv| !self.leaves_in_check(mv, side))
            .collect();
        log::trace!("{}: {} pseudo moves, {} legal", side, total, legal.len());
        legal
    }

    pub fn current_legal_moves(&mut self) -> Vec<Move> {
        self.legal_moves(self.turn)
    }

    /// Legal moves of the piece on `from`, empty unless it belongs to the side to move.
    pub fn legal_moves_from(&mut self, from: Sq) -> Vec<Move> {
        match self.board.occupant(from) {
            Some(piece) if piece.side == self.turn => movegen::piece_moves(&self.board, from)
                .into_iter()
                .filter(|mv| !self.leaves_in_check(mv, piece.side))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn leaves_in_check(&mut self, mv: &Move, side: Side) -> bool {
        self.commit(mv);
        let in_check = self.is_in_check(side);
        self.revert(mv);
        in_check
    }

    /// A side without a general on the board is never reported in check.
    pub fn is_in_check(&mut self, side: Side) -> bool {
        match self.board.find_general(side) {
            Some(general) => self.is_attacked_by(general, side.opponent()),
            None => false,
        }
    }

    /// Whether the opponent of the side to move has a pseudo move landing on `target`.
    pub fn square_under_attack(&mut self, target: Sq) -> bool {
        self.is_attacked_by(target, self.turn.opponent())
    }

    pub fn is_attacked_by(&mut self, target: Sq, attacker: Side) -> bool {
        self.attack_map(attacker).contains(target)
    }

    fn attack_map(&mut self, attacker: Side) -> AttackMap {
        let Some(cache) = self.cache.as_mut() else {
            return movegen::attacked_squares(&self.board, attacker);
        };
        let key = self.board_key ^ self.zobrist.attacker_key(attacker);
        if let Some(map) = cache.probe(key) {
            log::trace!("attack cache hit for {}", attacker);
            return map;
        }
        let map = movegen::attacked_squares(&self.board, attacker);
        cache.store(key, map);
        map
    }
}

// =====================
// Tests
// =====================
