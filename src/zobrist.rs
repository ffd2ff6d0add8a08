// Features:
// - Seeded, reproducible keys for every (square, piece) pair
// - Full board hashing and self-inverse incremental updates
// - Side-to-move and attacker keys for position and cache lookups
// - Hash verification against a full rescan

use crate::engine::{Board, Move, NUM_SQUARES, Piece, Side, Sq};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const PIECE_INDICES: usize = 14;

// =====================
// Core Zobrist Structure
// =====================

#[derive(Clone, Debug)]
pub struct Zobrist {
    // Piece placement keys: [square][side * 7 + kind]
    pub pieces: [[u64; PIECE_INDICES]; NUM_SQUARES],

    // XOR'd in when BLUE is to move
    pub side: u64,

    // Distinguishes attack maps of the two sides for one board
    pub attackers: [u64; 2],

    seed: u64,
}

impl Default for Zobrist {
    fn default() -> Self {
        Zobrist::new()
    }
}

impl Zobrist {
    pub fn new() -> Self {
        Self::with_seed(2024)
    }

    /// Same seed, same keys.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut pieces = [[0u64; PIECE_INDICES]; NUM_SQUARES];
        for row in pieces.iter_mut() {
            for key in row.iter_mut() {
                *key = rng.r#gen();
            }
        }
        let side = rng.r#gen();
        let attackers = [rng.r#gen(), rng.r#gen()];

        Self {
            pieces,
            side,
            attackers,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Index 0-6 for RED kinds, 7-13 for BLUE.
    pub fn piece_index(piece: Piece) -> usize {
        piece.side.index() * 7 + piece.kind.index()
    }

    // =====================
    // Hashing
    // =====================

    /// Full hash of the piece placement (side to move excluded).
    pub fn hash_board(&self, board: &Board) -> u64 {
        [Side::Red, Side::Blue]
            .into_iter()
            .flat_map(|side| board.pieces(side))
            .fold(0u64, |h, (s, piece)| h ^ self.pieces[s][Self::piece_index(piece)])
    }

    /// Add or remove `piece` on `s`.
    pub fn toggle_piece(&self, hash: u64, s: Sq, piece: Piece) -> u64 {
        hash ^ self.pieces[s][Self::piece_index(piece)]
    }

    /// Apply `mv` to a board hash. Applying it twice restores the original.
    pub fn update_move(&self, hash: u64, mv: &Move) -> u64 {
        let mut h = self.toggle_piece(hash, mv.from, mv.piece);
        if let Some(cap) = mv.captured {
            h = self.toggle_piece(h, mv.to, cap);
        }
        self.toggle_piece(h, mv.to, mv.piece)
    }

    pub fn side_key(&self, side: Side) -> u64 {
        match side {
            Side::Red => 0,
            Side::Blue => self.side,
        }
    }

    pub fn attacker_key(&self, attacker: Side) -> u64 {
        self.attackers[attacker.index()]
    }

    /// Check an incrementally maintained hash against a full rescan.
    pub fn verify_hash(&self, board: &Board, incremental: u64) -> bool {
        let full = self.hash_board(board);
        if full != incremental {
            log::warn!(
                "hash mismatch: incremental 0x{:016X}, full 0x{:016X}",
                incremental,
                full
            );
            return false;
        }
        true
    }
}

// =====================
// Tests
// =====================
