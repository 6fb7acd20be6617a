//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! The table holds one random key per `(square, piece code)` pair, empty code
//! included, so a full hash folds every square of the board. The keys come
//! from a fixed seed so hashes are identical across runs and builds.

use std::sync::OnceLock;

use crate::game_state::chess_types::*;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[u64; 16]; 64],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;

    let mut piece_square = [[0u64; 16]; 64];
    for square in &mut piece_square {
        for key in square {
            *key = next_random_u64(&mut seed);
        }
    }

    ZobristTables { piece_square }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Return the Zobrist key for `piece` standing on `square`.
#[inline]
pub fn piece_square_key(square: Square, piece: Piece) -> u64 {
    tables().piece_square[square as usize][piece.index()]
}

/// Compute the full position key from a board array.
pub fn compute_full(board: &[Piece; 64]) -> u64 {
    board
        .iter()
        .enumerate()
        .fold(0u64, |key, (sq, &piece)| key ^ piece_square_key(sq as Square, piece))
}

/// Replace `old` by `new` on `square`.
#[inline]
pub fn update(key: u64, square: Square, old: Piece, new: Piece) -> u64 {
    key ^ piece_square_key(square, old) ^ piece_square_key(square, new)
}

/// Two-square update, e.g. a plain move.
#[inline]
pub fn update2(key: u64, changes: [(Square, Piece, Piece); 2]) -> u64 {
    let [(s0, o0, n0), (s1, o1, n1)] = changes;
    update(update(key, s0, o0, n0), s1, o1, n1)
}

/// Four-square update, e.g. castling's king and rook relocation.
#[inline]
pub fn update4(key: u64, changes: [(Square, Piece, Piece); 4]) -> u64 {
    let [a, b, c, d] = changes;
    update2(update2(key, [a, b]), [c, d])
}
