//! A single ply as produced by move enumeration.
//!
//! The captured-piece memo travels with the move so that undo can restore the
//! eaten piece without consulting any other state.

use std::fmt;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::CastleSide;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_to_algebraic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    /// Pawn advancing two squares from its home rank.
    DoubleStep,
    /// King move of a castling; the rook moves as part of the same ply.
    Castle(CastleSide),
    /// Pawn capture of the pawn beside it that just made a double step.
    EnPassant,
    /// Pawn reaching the last rank. `PieceKind::Pawn` means it stays a pawn.
    Promotion(PieceKind),
}

impl MoveKind {
    const CASTLE_KING_BYTE: u8 = 2;
    const CASTLE_QUEEN_BYTE: u8 = 3;
    const EN_PASSANT_BYTE: u8 = 4;
    const PROMOTION_BASE: u8 = 8;

    /// One-byte form used by the saved-game format.
    pub fn to_byte(self) -> u8 {
        match self {
            MoveKind::Normal => 0,
            MoveKind::DoubleStep => 1,
            MoveKind::Castle(CastleSide::King) => Self::CASTLE_KING_BYTE,
            MoveKind::Castle(CastleSide::Queen) => Self::CASTLE_QUEEN_BYTE,
            MoveKind::EnPassant => Self::EN_PASSANT_BYTE,
            MoveKind::Promotion(kind) => Self::PROMOTION_BASE + kind.code(),
        }
    }

    pub fn from_byte(byte: u8) -> ChessResult<Self> {
        match byte {
            0 => Ok(MoveKind::Normal),
            1 => Ok(MoveKind::DoubleStep),
            Self::CASTLE_KING_BYTE => Ok(MoveKind::Castle(CastleSide::King)),
            Self::CASTLE_QUEEN_BYTE => Ok(MoveKind::Castle(CastleSide::Queen)),
            Self::EN_PASSANT_BYTE => Ok(MoveKind::EnPassant),
            b if b > Self::PROMOTION_BASE && b - Self::PROMOTION_BASE < PieceKind::King.code() => {
                PieceKind::from_code(b - Self::PROMOTION_BASE)
                    .map(MoveKind::Promotion)
                    .ok_or(ChessErrors::InvalidMoveKind(byte))
            }
            _ => Err(ChessErrors::InvalidMoveKind(byte)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Piece removed by this move, `Piece::EMPTY` when nothing is captured.
    pub captured: Piece,
    pub kind: MoveKind,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, captured: Piece, kind: MoveKind) -> Self {
        Move {
            from,
            to,
            captured,
            kind,
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    #[inline]
    pub const fn promotion(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion(kind) => Some(kind),
            _ => None,
        }
    }

    /// Square the captured piece stood on. Differs from `to` only for en passant.
    #[inline]
    pub const fn capture_square(&self) -> Square {
        match self.kind {
            MoveKind::EnPassant => square_at(column(self.to), rank(self.from)),
            _ => self.to,
        }
    }
}

impl fmt::Display for Move {
    /// `<from><'-' or 'x'><to>` plus the promotion letter, e.g. `e7xd8Q`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.is_capture() { 'x' } else { '-' };
        write!(
            f,
            "{}{}{}",
            square_to_algebraic(self.from),
            separator,
            square_to_algebraic(self.to)
        )?;
        if let Some(kind) = self.promotion() {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notation_marks_captures_and_promotions() {
        let e2 = square_at(3, 1);
        let e4 = square_at(3, 3);
        assert_eq!(Move::new(e2, e4, Piece::EMPTY, MoveKind::DoubleStep).to_string(), "e2-e4");

        let e7 = square_at(3, 6);
        let rook = Piece::new(Color::Black, PieceKind::Rook);
        let promo = Move::new(e7, D8, rook, MoveKind::Promotion(PieceKind::Queen));
        assert_eq!(promo.to_string(), "e7xd8Q");
    }

    #[test]
    fn en_passant_captures_beside_the_origin() {
        let e5 = square_at(3, 4);
        let d6 = square_at(4, 5);
        let pawn = Piece::new(Color::Black, PieceKind::Pawn);
        let mv = Move::new(e5, d6, pawn, MoveKind::EnPassant);
        assert_eq!(mv.capture_square(), square_at(4, 4));
        assert_eq!(mv.to_string(), "e5xd6");
    }

    #[test]
    fn kind_bytes_cover_every_variant() {
        let kinds = [
            MoveKind::Normal,
            MoveKind::DoubleStep,
            MoveKind::Castle(CastleSide::King),
            MoveKind::Castle(CastleSide::Queen),
            MoveKind::EnPassant,
            MoveKind::Promotion(PieceKind::Queen),
            MoveKind::Promotion(PieceKind::Pawn),
        ];
        for kind in kinds {
            assert_eq!(MoveKind::from_byte(kind.to_byte()), Ok(kind));
        }
        assert!(MoveKind::from_byte(5).is_err());
        assert!(MoveKind::from_byte(8 + PieceKind::King.code()).is_err());
        assert!(MoveKind::from_byte(8 + 9).is_err());
    }

    #[test]
    fn castle_moves_hash_by_side() {
        use std::collections::HashSet;
        let kinds: HashSet<MoveKind> = [
            MoveKind::Castle(CastleSide::King),
            MoveKind::Castle(CastleSide::Queen),
            MoveKind::Castle(CastleSide::King),
        ]
        .into_iter()
        .collect();
        assert_eq!(kinds.len(), 2);
    }
}
