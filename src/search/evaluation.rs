//! Pluggable static evaluation.
//!
//! The position gathers everything an evaluator may look at into an
//! `EvalContext` and hands it to whichever `Evaluator` the caller selected, so
//! search code can swap heuristics without touching the board engine.

use crate::game_state::chess_rules::CastleSide;
use crate::game_state::chess_types::*;
use crate::history::packed_position::StateFlags;
use crate::move_generation::legal_move_generator::AttackInfo;

/// Inputs of one evaluation call.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub board: &'a [Piece; 64],
    pub piece_counts: &'a [u8; 16],
    /// Indexed by `Color::index()`.
    pub attacks: [&'a AttackInfo; 2],
    pub king_square: [Square; 2],
    /// Side to move and castling eligibility.
    pub flags: StateFlags,
    /// White legal moves minus black legal moves.
    pub move_count_delta: i32,
}

impl EvalContext<'_> {
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.flags.side_to_move()
    }

    #[inline]
    pub fn count(&self, color: Color, kind: PieceKind) -> i32 {
        i32::from(self.piece_counts[Piece::new(color, kind).index()])
    }

    #[inline]
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        self.flags.can_castle(color, side)
    }
}

pub trait Evaluator: Send + Sync {
    /// Score from the perspective of the side to move.
    fn evaluate(&self, ctx: &EvalContext<'_>) -> i32;
}

/// Material balance plus a small mobility term.
#[derive(Debug, Clone, Copy)]
pub struct MaterialEvaluator {
    /// Centipawns per legal move of difference between the sides.
    pub mobility_weight: i32,
}

impl Default for MaterialEvaluator {
    fn default() -> Self {
        Self { mobility_weight: 2 }
    }
}

impl MaterialEvaluator {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    fn material_white_minus_black(ctx: &EvalContext<'_>) -> i32 {
        PieceKind::ALL
            .iter()
            .map(|&kind| {
                Self::piece_value(kind) * (ctx.count(Color::White, kind) - ctx.count(Color::Black, kind))
            })
            .sum()
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> i32 {
        let white_minus_black =
            Self::material_white_minus_black(ctx) + self.mobility_weight * ctx.move_count_delta;
        match ctx.side_to_move() {
            Color::White => white_minus_black,
            Color::Black => -white_minus_black,
        }
    }
}

impl Position {
    /// Run `evaluator` on the current position.
    pub fn evaluate(&mut self, evaluator: &dyn Evaluator) -> i32 {
        let white = self.attack_info(Color::White);
        let black = self.attack_info(Color::Black);
        let ctx = EvalContext {
            board: &self.board,
            piece_counts: &self.piece_counts,
            attacks: [&white, &black],
            king_square: self.king_square,
            flags: self.state_flags(),
            move_count_delta: white.move_count as i32 - black.move_count as i32,
        };
        evaluator.evaluate(&ctx)
    }
}
