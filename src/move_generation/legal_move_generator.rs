//! Legal move enumeration with attack statistics.
//!
//! Candidates are produced per piece from the geometry tables, then each one
//! is played on the live board through a `TrialMove` guard and kept only if
//! the mover's king is not attacked afterwards. The same pass records how many
//! times each square is hit, which evaluators consume as `AttackInfo`.

use crate::game_state::chess_rules::{castle_geometry, CastleSide};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{attackers_of, is_square_attacked};
use crate::move_generation::trial_move::TrialMove;
use crate::moves::chess_move::{Move, MoveKind};
use crate::moves::move_tables::move_tables;

/// Promotion variants in the order they are offered.
const PROMOTIONS: [PieceKind; 5] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Pawn,
];

/// Attack and mobility statistics for one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackInfo {
    /// Legal moves.
    pub move_count: usize,
    /// Legal moves that take a piece.
    pub capture_count: usize,
    /// Own pieces covered by another own piece.
    pub defend_count: usize,
    /// Pseudo-attacks landing on each square.
    pub control: [u8; 64],
    pub in_check: bool,
}

impl Default for AttackInfo {
    fn default() -> Self {
        AttackInfo {
            move_count: 0,
            capture_count: 0,
            defend_count: 0,
            control: [0; 64],
            in_check: false,
        }
    }
}

impl AttackInfo {
    /// Note that a piece of `color` hits `target`.
    #[inline]
    fn hit(&mut self, board: &[Piece; 64], color: Color, target: Square) {
        self.control[target as usize] = self.control[target as usize].saturating_add(1);
        if board[target as usize].is_color(color) {
            self.defend_count += 1;
        }
    }
}

impl Position {
    /// Legal moves of `color` plus attack statistics. With `need_list` false
    /// only the statistics are returned.
    pub fn enumerate(&mut self, color: Color, need_list: bool) -> (Option<Vec<Move>>, AttackInfo) {
        let mut info = AttackInfo {
            in_check: self.is_in_check(color),
            ..AttackInfo::default()
        };
        let candidates = self.pseudo_legal_moves(color, &mut info);

        let mut legal = if need_list {
            Vec::with_capacity(candidates.len())
        } else {
            Vec::new()
        };
        for mv in candidates {
            if self.leaves_king_safe(&mv, color) {
                info.move_count += 1;
                if mv.is_capture() {
                    info.capture_count += 1;
                }
                if need_list {
                    legal.push(mv);
                }
            }
        }

        (need_list.then_some(legal), info)
    }

    /// Legal moves of `color`.
    pub fn enumerate_moves(&mut self, color: Color) -> Vec<Move> {
        self.enumerate(color, true).0.unwrap_or_default()
    }

    /// Legal moves of the side to move.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        self.enumerate_moves(self.side_to_move)
    }

    /// Statistics only, as used by evaluation passes.
    pub fn attack_info(&mut self, color: Color) -> AttackInfo {
        self.enumerate(color, false).1
    }

    /// Play `mv` on a trial basis and test the mover's king.
    fn leaves_king_safe(&mut self, mv: &Move, color: Color) -> bool {
        let own_king = self.king_square[color.index()];
        let king_square = if mv.from == own_king { mv.to } else { own_king };
        let trial = TrialMove::play(&mut self.board, mv, color);
        attackers_of(&trial, color.opposite(), king_square, None) == 0
    }

    fn pseudo_legal_moves(&self, color: Color, info: &mut AttackInfo) -> Vec<Move> {
        let mut out = Vec::with_capacity(64);
        for from in 0..64u8 {
            let piece = self.board[from as usize];
            if !piece.is_color(color) {
                continue;
            }
            match piece.kind() {
                Some(PieceKind::Pawn) => self.pawn_moves(from, color, info, &mut out),
                Some(PieceKind::Knight) => {
                    self.step_moves(from, color, move_tables().knight_steps(from), info, &mut out)
                }
                Some(PieceKind::King) => {
                    self.step_moves(from, color, move_tables().king_steps(from), info, &mut out)
                }
                Some(kind) => self.slider_moves(from, color, kind, info, &mut out),
                None => {}
            }
        }
        self.castle_moves(color, &mut out);
        self.en_passant_moves(color, &mut out);
        out
    }

    fn slider_moves(
        &self,
        from: Square,
        color: Color,
        kind: PieceKind,
        info: &mut AttackInfo,
        out: &mut Vec<Move>,
    ) {
        for ray in move_tables().slider_rays(kind, from) {
            for &to in ray {
                info.hit(&self.board, color, to);
                let target = self.board[to as usize];
                if target.is_empty() {
                    out.push(Move::new(from, to, Piece::EMPTY, MoveKind::Normal));
                    continue;
                }
                if !target.is_color(color) {
                    out.push(Move::new(from, to, target, MoveKind::Normal));
                }
                break;
            }
        }
    }

    fn step_moves(
        &self,
        from: Square,
        color: Color,
        steps: &[Square],
        info: &mut AttackInfo,
        out: &mut Vec<Move>,
    ) {
        for &to in steps {
            info.hit(&self.board, color, to);
            let target = self.board[to as usize];
            if !target.is_color(color) {
                out.push(Move::new(from, to, target, MoveKind::Normal));
            }
        }
    }

    fn pawn_moves(&self, from: Square, color: Color, info: &mut AttackInfo, out: &mut Vec<Move>) {
        let tables = move_tables();

        // Pushes are listed nearest first; the double step needs both squares empty.
        for &to in tables.pawn_pushes(color, from) {
            if !self.board[to as usize].is_empty() {
                break;
            }
            let kind = if rank(to).abs_diff(rank(from)) == 2 {
                MoveKind::DoubleStep
            } else {
                MoveKind::Normal
            };
            self.push_pawn_move(Move::new(from, to, Piece::EMPTY, kind), color, out);
        }

        for &to in tables.pawn_captures(color, from) {
            info.hit(&self.board, color, to);
            let target = self.board[to as usize];
            if target.is_color(color.opposite()) {
                self.push_pawn_move(Move::new(from, to, target, MoveKind::Normal), color, out);
            }
        }
    }

    /// Expand a pawn move landing on the last rank into its promotion variants.
    fn push_pawn_move(&self, mv: Move, color: Color, out: &mut Vec<Move>) {
        if rank(mv.to) != color.promotion_rank() {
            out.push(mv);
            return;
        }
        for kind in PROMOTIONS {
            if kind == PieceKind::Pawn && !self.config.offer_pawn_promotion {
                continue;
            }
            out.push(Move {
                kind: MoveKind::Promotion(kind),
                ..mv
            });
        }
    }

    fn castle_moves(&self, color: Color, out: &mut Vec<Move>) {
        for side in CastleSide::BOTH {
            if !self.can_castle(color, side) {
                continue;
            }
            let geometry = castle_geometry(color, side);
            if geometry
                .between
                .iter()
                .any(|&sq| !self.board[sq as usize].is_empty())
            {
                continue;
            }
            let enemy = color.opposite();
            if geometry
                .king_path
                .iter()
                .any(|&sq| is_square_attacked(&self.board, enemy, sq))
            {
                continue;
            }
            out.push(Move::new(
                geometry.king_from,
                geometry.king_to,
                Piece::EMPTY,
                MoveKind::Castle(side),
            ));
        }
    }

    fn en_passant_moves(&self, color: Color, out: &mut Vec<Move>) {
        let Some(target) = self.en_passant else {
            return;
        };
        let victim = self.board[target as usize];
        if !victim.is(color.opposite(), PieceKind::Pawn) {
            return;
        }
        let col = column(target);
        let row = rank(target);
        let landing = square_at(col, (row as i8 + color.forward() / 8) as u8);
        if !self.board[landing as usize].is_empty() {
            return;
        }
        for neighbour_col in [col.checked_sub(1), (col < 7).then_some(col + 1)]
            .into_iter()
            .flatten()
        {
            let from = square_at(neighbour_col, row);
            if self.board[from as usize].is(color, PieceKind::Pawn) {
                out.push(Move::new(from, landing, victim, MoveKind::EnPassant));
            }
        }
    }
}
