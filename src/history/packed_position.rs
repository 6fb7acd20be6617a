//! Compact fixed-width board encoding.
//!
//! A board packs into four `u64` words with 4 bits per square (16 squares per
//! word, square 0 in the low nibble of word 0). Side to move, castling
//! eligibility and en-passant availability live in a separate `StateFlags`
//! word. Both are cheap to compare, which is what the repetition detector and
//! the saved-game format rely on.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::CastleSide;
use crate::game_state::chess_types::*;

/// Board contents as 64 nibbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedPosition {
    pub words: [u64; 4],
}

impl PackedPosition {
    pub fn from_board(board: &[Piece; 64]) -> Self {
        let mut packed = PackedPosition::default();
        for (sq, &piece) in board.iter().enumerate() {
            packed.set(sq as Square, piece);
        }
        packed
    }

    #[inline]
    fn slot(square: Square) -> (usize, u32) {
        ((square >> 4) as usize, u32::from(square & 15) * 4)
    }

    /// Raw nibble stored for `square`.
    #[inline]
    pub fn code(&self, square: Square) -> u8 {
        let (word, shift) = Self::slot(square);
        ((self.words[word] >> shift) & 0xF) as u8
    }

    /// Overwrite one square in place.
    #[inline]
    pub fn set(&mut self, square: Square, piece: Piece) {
        let (word, shift) = Self::slot(square);
        self.words[word] = (self.words[word] & !(0xF << shift)) | (u64::from(piece.code()) << shift);
    }

    /// Decode back into a board array, rejecting nibbles that are not pieces.
    pub fn unpack(&self) -> ChessResult<[Piece; 64]> {
        let mut board = [Piece::EMPTY; 64];
        for sq in 0..64u8 {
            let code = self.code(sq);
            board[sq as usize] =
                Piece::from_code(code).ok_or(ChessErrors::InvalidPieceCode(sq, code))?;
        }
        Ok(board)
    }
}

pub const FLAG_BLACK_TO_MOVE: u32 = 1;
const CASTLE_SHIFT: u32 = 1;
pub const FLAG_EN_PASSANT: u32 = 1 << 5;
const EN_PASSANT_COLUMN_SHIFT: u32 = 6;
/// Every bit the current encoding defines.
pub const STATE_FLAGS_MASK: u32 = 0x1FF;

/// Side to move, castling eligibility and en-passant column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StateFlags(u32);

impl StateFlags {
    #[inline]
    fn castle_bit(color: Color, side: CastleSide) -> u32 {
        1 << (CASTLE_SHIFT + (color.index() * 2 + side.index()) as u32)
    }

    /// `castling` is indexed `[color][side]`; `en_passant_column` is set only
    /// when an en-passant capture is actually available.
    pub fn new(side_to_move: Color, castling: [[bool; 2]; 2], en_passant_column: Option<u8>) -> Self {
        let mut bits = 0;
        if side_to_move == Color::Black {
            bits |= FLAG_BLACK_TO_MOVE;
        }
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if castling[color.index()][side.index()] {
                    bits |= Self::castle_bit(color, side);
                }
            }
        }
        if let Some(col) = en_passant_column {
            bits |= FLAG_EN_PASSANT | (u32::from(col & 7) << EN_PASSANT_COLUMN_SHIFT);
        }
        StateFlags(bits)
    }

    /// Accept only words in the current encoding. A column without the
    /// availability bit is a legacy form and is rejected rather than re-derived.
    pub fn from_bits(bits: u32) -> ChessResult<Self> {
        if bits & !STATE_FLAGS_MASK != 0 {
            return Err(ChessErrors::InvalidStateFlags(bits));
        }
        if bits & FLAG_EN_PASSANT == 0 && bits >> EN_PASSANT_COLUMN_SHIFT != 0 {
            return Err(ChessErrors::InvalidStateFlags(bits));
        }
        Ok(StateFlags(bits))
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn side_to_move(self) -> Color {
        if self.0 & FLAG_BLACK_TO_MOVE != 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    #[inline]
    pub fn can_castle(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::castle_bit(color, side) != 0
    }

    #[inline]
    pub fn en_passant_column(self) -> Option<u8> {
        if self.0 & FLAG_EN_PASSANT != 0 {
            Some(((self.0 >> EN_PASSANT_COLUMN_SHIFT) & 7) as u8)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_BOARD;

    #[test]
    fn packs_four_bits_per_square() {
        let packed = PackedPosition::from_board(&STARTING_BOARD);
        assert_eq!(packed.code(E1), Piece::new(Color::White, PieceKind::King).code());
        assert_eq!(packed.code(A8), Piece::new(Color::Black, PieceKind::Rook).code());
        // Ranks 3-6 are empty: words 1 and 2 hold squares 16-47.
        assert_eq!(packed.words[1], 0);
        assert_eq!(packed.words[2], 0);
        assert_eq!(packed.unpack().expect("start board should unpack"), STARTING_BOARD);
    }

    #[test]
    fn set_updates_in_place() {
        let mut packed = PackedPosition::from_board(&STARTING_BOARD);
        packed.set(E1, Piece::EMPTY);
        packed.set(G1, Piece::new(Color::White, PieceKind::King));
        let mut board = STARTING_BOARD;
        board[E1 as usize] = Piece::EMPTY;
        board[G1 as usize] = Piece::new(Color::White, PieceKind::King);
        assert_eq!(packed, PackedPosition::from_board(&board));
    }

    #[test]
    fn unpack_rejects_non_piece_codes() {
        let mut packed = PackedPosition::default();
        packed.words[0] = 0x7 << 8;
        assert_eq!(packed.unpack(), Err(ChessErrors::InvalidPieceCode(2, 7)));
    }

    #[test]
    fn state_flags_decode_what_they_encode() {
        let flags = StateFlags::new(Color::Black, [[true, false], [false, true]], Some(5));
        assert_eq!(flags.side_to_move(), Color::Black);
        assert!(flags.can_castle(Color::White, CastleSide::King));
        assert!(!flags.can_castle(Color::White, CastleSide::Queen));
        assert!(flags.can_castle(Color::Black, CastleSide::Queen));
        assert_eq!(flags.en_passant_column(), Some(5));
        assert_eq!(StateFlags::from_bits(flags.bits()), Ok(flags));
    }

    #[test]
    fn legacy_and_reserved_bits_are_rejected() {
        assert!(StateFlags::from_bits(1 << 12).is_err());
        assert!(StateFlags::from_bits(3 << EN_PASSANT_COLUMN_SHIFT).is_err());
        assert!(StateFlags::from_bits(FLAG_EN_PASSANT | (3 << EN_PASSANT_COLUMN_SHIFT)).is_ok());
    }
}
