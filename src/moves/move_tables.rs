//! Precomputed per-square move geometry.
//!
//! Every table is built once into a process-wide singleton and never mutated
//! afterwards, so clones of a `Position` on any thread share it freely. Move
//! generation walks these tables outward from a piece; attack detection walks
//! the same tables outward from the target square.

use std::sync::OnceLock;

use crate::game_state::chess_types::*;

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

#[derive(Debug)]
pub struct MoveTables {
    /// `[square][direction]`, nearest square first. Directions 0-3 are
    /// orthogonal, 4-7 diagonal.
    rays: Vec<[Vec<Square>; 8]>,
    knight: Vec<Vec<Square>>,
    king: Vec<Vec<Square>>,
    /// `[color][square]`: one step forward, plus the double step from the home rank.
    pawn_push: [Vec<Vec<Square>>; 2],
    /// `[color][square]`: forward diagonals.
    pawn_capture: [Vec<Vec<Square>>; 2],
    /// `[color][square]`: squares from which a pawn of `color` hits `square`.
    pawn_attackers: [Vec<Vec<Square>>; 2],
}

static TABLES: OnceLock<MoveTables> = OnceLock::new();

/// Shared geometry tables, built on first use.
#[inline]
pub fn move_tables() -> &'static MoveTables {
    TABLES.get_or_init(build_tables)
}

fn offset(square: Square, d_col: i8, d_rank: i8) -> Option<Square> {
    let col = column(square) as i8 + d_col;
    let rnk = rank(square) as i8 + d_rank;
    if (0..8).contains(&col) && (0..8).contains(&rnk) {
        Some(square_at(col as u8, rnk as u8))
    } else {
        None
    }
}

fn walk(square: Square, d_col: i8, d_rank: i8) -> Vec<Square> {
    let mut out = Vec::with_capacity(7);
    let mut current = square;
    while let Some(next) = offset(current, d_col, d_rank) {
        out.push(next);
        current = next;
    }
    out
}

fn steps(square: Square, deltas: &[(i8, i8)]) -> Vec<Square> {
    deltas
        .iter()
        .filter_map(|&(dc, dr)| offset(square, dc, dr))
        .collect()
}

fn build_tables() -> MoveTables {
    let mut rays: Vec<[Vec<Square>; 8]> = Vec::with_capacity(64);
    let mut knight: Vec<Vec<Square>> = Vec::with_capacity(64);
    let mut king: Vec<Vec<Square>> = Vec::with_capacity(64);
    let mut pawn_push: [Vec<Vec<Square>>; 2] = [Vec::with_capacity(64), Vec::with_capacity(64)];
    let mut pawn_capture: [Vec<Vec<Square>>; 2] = [Vec::with_capacity(64), Vec::with_capacity(64)];
    let mut pawn_attackers: [Vec<Vec<Square>>; 2] = [vec![Vec::new(); 64], vec![Vec::new(); 64]];

    let king_deltas: Vec<(i8, i8)> = ORTHOGONAL.iter().chain(DIAGONAL.iter()).copied().collect();

    for sq in 0..64u8 {
        rays.push(std::array::from_fn(|dir| {
            let (dc, dr) = if dir < 4 { ORTHOGONAL[dir] } else { DIAGONAL[dir - 4] };
            walk(sq, dc, dr)
        }));
        knight.push(steps(sq, &KNIGHT));
        king.push(steps(sq, &king_deltas));

        for color in Color::BOTH {
            let dr = color.forward().signum();
            let mut pushes = Vec::with_capacity(2);
            if rank(sq) != color.promotion_rank() {
                if let Some(one) = offset(sq, 0, dr) {
                    pushes.push(one);
                    if rank(sq) == color.pawn_home_rank() {
                        if let Some(two) = offset(one, 0, dr) {
                            pushes.push(two);
                        }
                    }
                }
            }
            pawn_push[color.index()].push(pushes);
            pawn_capture[color.index()].push(steps(sq, &[(1, dr), (-1, dr)]));
        }
    }

    for color in Color::BOTH {
        for from in 0..64u8 {
            for &target in &pawn_capture[color.index()][from as usize] {
                pawn_attackers[color.index()][target as usize].push(from);
            }
        }
    }

    MoveTables {
        rays,
        knight,
        king,
        pawn_push,
        pawn_capture,
        pawn_attackers,
    }
}

impl MoveTables {
    #[inline]
    pub fn orthogonal_rays(&self, square: Square) -> &[Vec<Square>] {
        &self.rays[square as usize][..4]
    }

    #[inline]
    pub fn diagonal_rays(&self, square: Square) -> &[Vec<Square>] {
        &self.rays[square as usize][4..]
    }

    /// Rays a sliding piece of `kind` travels along.
    #[inline]
    pub fn slider_rays(&self, kind: PieceKind, square: Square) -> &[Vec<Square>] {
        match kind {
            PieceKind::Rook => self.orthogonal_rays(square),
            PieceKind::Bishop => self.diagonal_rays(square),
            _ => &self.rays[square as usize][..],
        }
    }

    #[inline]
    pub fn knight_steps(&self, square: Square) -> &[Square] {
        &self.knight[square as usize]
    }

    #[inline]
    pub fn king_steps(&self, square: Square) -> &[Square] {
        &self.king[square as usize]
    }

    #[inline]
    pub fn pawn_pushes(&self, color: Color, square: Square) -> &[Square] {
        &self.pawn_push[color.index()][square as usize]
    }

    #[inline]
    pub fn pawn_captures(&self, color: Color, square: Square) -> &[Square] {
        &self.pawn_capture[color.index()][square as usize]
    }

    /// Squares where a pawn of `color` would attack `square`.
    #[inline]
    pub fn pawn_attackers(&self, color: Color, square: Square) -> &[Square] {
        &self.pawn_attackers[color.index()][square as usize]
    }
}
