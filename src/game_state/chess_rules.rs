//! Canonical chess-rule constants.
//!
//! This module stores the standard starting layout, the castling geometry for
//! both colors and sides, and the limits used by the draw detectors.

use crate::game_state::chess_types::*;

/// Half-moves without a pawn move or capture that force a draw.
pub const FIFTY_MOVE_PLIES: u16 = 100;

/// Number of occurrence buckets in the repetition table.
pub const REPETITION_BUCKETS: usize = 16_384;

const fn white(kind: PieceKind) -> Piece {
    Piece::new(Color::White, kind)
}

const fn black(kind: PieceKind) -> Piece {
    Piece::new(Color::Black, kind)
}

const fn build_start_board() -> [Piece; 64] {
    use PieceKind::*;
    // Column 0 is the h-file, so each back rank reads h..a.
    let back = [Rook, Knight, Bishop, King, Queen, Bishop, Knight, Rook];
    let mut board = [Piece::EMPTY; 64];
    let mut col = 0;
    while col < 8 {
        board[col] = white(back[col]);
        board[8 + col] = white(Pawn);
        board[48 + col] = black(Pawn);
        board[56 + col] = black(back[col]);
        col += 1;
    }
    board
}

/// Standard starting position, indexed by square.
pub const STARTING_BOARD: [Piece; 64] = build_start_board();

/// Castling side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Towards the h-file.
    King,
    /// Towards the a-file.
    Queen,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CastleSide::King => 0,
            CastleSide::Queen => 1,
        }
    }
}

/// Slots of `Position::castle_counters`.
pub const WHITE_KING_COUNTER: usize = 0;
pub const WHITE_KING_ROOK_COUNTER: usize = 1;
pub const WHITE_QUEEN_ROOK_COUNTER: usize = 2;
pub const BLACK_KING_COUNTER: usize = 3;
pub const BLACK_KING_ROOK_COUNTER: usize = 4;
pub const BLACK_QUEEN_ROOK_COUNTER: usize = 5;

/// Squares whose departure or capture disables castling, in counter order.
pub const CASTLE_ORIGINS: [Square; 6] = [E1, H1, A1, E8, H8, A8];

/// Counter slot tracking the piece that starts on `square`, if any.
#[inline]
pub fn castle_counter_for(square: Square) -> Option<usize> {
    CASTLE_ORIGINS.iter().position(|&origin| origin == square)
}

/// Fixed geometry of one castling move.
#[derive(Debug, Clone, Copy)]
pub struct CastleGeometry {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub between: &'static [Square],
    /// King start, transit and landing squares; none may be attacked.
    pub king_path: [Square; 3],
    pub king_counter: usize,
    pub rook_counter: usize,
}

/// Castling geometry indexed by `[color][side]`.
pub const CASTLES: [[CastleGeometry; 2]; 2] = [
    [
        CastleGeometry {
            king_from: E1,
            king_to: G1,
            rook_from: H1,
            rook_to: F1,
            between: &[F1, G1],
            king_path: [E1, F1, G1],
            king_counter: WHITE_KING_COUNTER,
            rook_counter: WHITE_KING_ROOK_COUNTER,
        },
        CastleGeometry {
            king_from: E1,
            king_to: C1,
            rook_from: A1,
            rook_to: D1,
            between: &[D1, C1, B1],
            king_path: [E1, D1, C1],
            king_counter: WHITE_KING_COUNTER,
            rook_counter: WHITE_QUEEN_ROOK_COUNTER,
        },
    ],
    [
        CastleGeometry {
            king_from: E8,
            king_to: G8,
            rook_from: H8,
            rook_to: F8,
            between: &[F8, G8],
            king_path: [E8, F8, G8],
            king_counter: BLACK_KING_COUNTER,
            rook_counter: BLACK_KING_ROOK_COUNTER,
        },
        CastleGeometry {
            king_from: E8,
            king_to: C8,
            rook_from: A8,
            rook_to: D8,
            between: &[D8, C8, B8],
            king_path: [E8, D8, C8],
            king_counter: BLACK_KING_COUNTER,
            rook_counter: BLACK_QUEEN_ROOK_COUNTER,
        },
    ],
];

#[inline]
pub fn castle_geometry(color: Color, side: CastleSide) -> &'static CastleGeometry {
    &CASTLES[color.index()][side.index()]
}
