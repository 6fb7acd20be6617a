//! Core value types shared by every subsystem.
//!
//! Squares are plain `u8` indices with the column in bits 0-2 and the rank in
//! bits 3-5. Column 0 is the h-file, so square 0 is `h1` and square 63 is `a8`.
//! Pieces are 4-bit codes (`type | color`) so that every table sized 16 can be
//! indexed directly by a piece.

pub use crate::game_state::position::Position;

/// Board square index (`0..=63`).
pub type Square = u8;

/// Isolates the piece type from a piece code.
pub const PIECE_MASK: u8 = 0x07;
/// Isolates the color from a piece code.
pub const COLOR_BIT: u8 = 0x08;

pub const H1: Square = 0;
pub const G1: Square = 1;
pub const F1: Square = 2;
pub const E1: Square = 3;
pub const D1: Square = 4;
pub const C1: Square = 5;
pub const B1: Square = 6;
pub const A1: Square = 7;
pub const H8: Square = 56;
pub const G8: Square = 57;
pub const F8: Square = 58;
pub const E8: Square = 59;
pub const D8: Square = 60;
pub const C8: Square = 61;
pub const B8: Square = 62;
pub const A8: Square = 63;

#[inline]
pub const fn column(square: Square) -> u8 {
    square & 7
}

#[inline]
pub const fn rank(square: Square) -> u8 {
    square >> 3
}

#[inline]
pub const fn square_at(column: u8, rank: u8) -> Square {
    (rank << 3) | column
}

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The bit this color contributes to a piece code.
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => COLOR_BIT,
        }
    }

    /// Rank a pawn of this color starts on.
    #[inline]
    pub const fn pawn_home_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank a pawn of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Square offset of one pawn step forward.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        self.opposite()
    }
}

/// Piece type without color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code & PIECE_MASK {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Upper-case letter used in notation and board dumps.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_minor(self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop)
    }
}

/// A square's content as a 4-bit `type | color` code. Code 0 is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    pub const EMPTY: Piece = Piece(0);

    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece(kind.code() | color.bit())
    }

    /// Accept only codes that can appear on a board: 0, 1-6 and 9-14.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        if code == 0 {
            return Some(Piece::EMPTY);
        }
        if code > 15 {
            return None;
        }
        match PieceKind::from_code(code) {
            Some(_) => Some(Piece(code)),
            None => None,
        }
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn kind(self) -> Option<PieceKind> {
        PieceKind::from_code(self.0)
    }

    #[inline]
    pub const fn color(self) -> Option<Color> {
        if self.0 == 0 {
            None
        } else if self.0 & COLOR_BIT == 0 {
            Some(Color::White)
        } else {
            Some(Color::Black)
        }
    }

    /// True when the square holds a piece of `color`.
    #[inline]
    pub const fn is_color(self, color: Color) -> bool {
        self.0 != 0 && (self.0 & COLOR_BIT) == color.bit()
    }

    #[inline]
    pub const fn is(self, color: Color, kind: PieceKind) -> bool {
        self.0 == kind.code() | color.bit()
    }

    /// FEN-style letter: upper case for white, lower case for black, '.' when empty.
    pub fn symbol(self) -> char {
        match (self.kind(), self.color()) {
            (Some(kind), Some(Color::White)) => kind.letter(),
            (Some(kind), Some(Color::Black)) => kind.letter().to_ascii_lowercase(),
            _ => '.',
        }
    }
}
