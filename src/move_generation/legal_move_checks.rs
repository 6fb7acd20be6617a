//! Attack detection by scanning outward from the target square.
//!
//! The same geometry tables that drive move generation are walked in reverse:
//! from the target along each ray until the first occupied square, then the
//! occupant is tested against the piece types that attack along that geometry.

use crate::game_state::chess_types::*;
use crate::moves::move_tables::move_tables;

#[inline]
fn record(positions: &mut Option<&mut Vec<Square>>, square: Square) {
    if let Some(out) = positions.as_deref_mut() {
        out.push(square);
    }
}

/// Count pieces of `attacker` that attack `square` on `board`, optionally
/// collecting their squares.
pub fn attackers_of(
    board: &[Piece; 64],
    attacker: Color,
    square: Square,
    mut positions: Option<&mut Vec<Square>>,
) -> usize {
    let tables = move_tables();
    let mut count = 0;

    for (rays, slider) in [
        (tables.diagonal_rays(square), PieceKind::Bishop),
        (tables.orthogonal_rays(square), PieceKind::Rook),
    ] {
        for ray in rays {
            let Some(&blocker) = ray.iter().find(|&&sq| !board[sq as usize].is_empty()) else {
                continue;
            };
            let piece = board[blocker as usize];
            if piece.is(attacker, slider) || piece.is(attacker, PieceKind::Queen) {
                count += 1;
                record(&mut positions, blocker);
            }
        }
    }

    for (steps, kind) in [
        (tables.knight_steps(square), PieceKind::Knight),
        (tables.king_steps(square), PieceKind::King),
        (tables.pawn_attackers(attacker, square), PieceKind::Pawn),
    ] {
        for &sq in steps {
            if board[sq as usize].is(attacker, kind) {
                count += 1;
                record(&mut positions, sq);
            }
        }
    }

    count
}

/// True as soon as one attacker of `square` is found.
pub fn is_square_attacked(board: &[Piece; 64], attacker: Color, square: Square) -> bool {
    attackers_of(board, attacker, square, None) > 0
}

impl Position {
    /// Pieces of `attacker` hitting `square` in the current position.
    pub fn attackers_of(
        &self,
        attacker: Color,
        square: Square,
        positions: Option<&mut Vec<Square>>,
    ) -> usize {
        attackers_of(&self.board, attacker, square, positions)
    }

    #[inline]
    pub fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        is_square_attacked(&self.board, attacker, square)
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opposite())
    }
}
