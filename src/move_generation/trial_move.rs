//! Scoped provisional move on the live board array.
//!
//! Legality filtering plays each candidate directly on the board, tests the
//! mover's king and then reverts. `TrialMove` owns the revert: every write goes
//! through it and `Drop` restores the saved squares in reverse order, so no
//! exit path can leave the board half-moved.

use std::ops::Deref;

use crate::game_state::chess_rules::castle_geometry;
use crate::game_state::chess_types::*;
use crate::moves::chess_move::{Move, MoveKind};

/// At most four squares change in one ply (castling).
const MAX_TOUCHED: usize = 4;

pub struct TrialMove<'a> {
    board: &'a mut [Piece; 64],
    saved: [(Square, Piece); MAX_TOUCHED],
    len: usize,
}

impl<'a> TrialMove<'a> {
    pub fn new(board: &'a mut [Piece; 64]) -> Self {
        TrialMove {
            board,
            saved: [(0, Piece::EMPTY); MAX_TOUCHED],
            len: 0,
        }
    }

    /// Play `mv` for `color` on the board; undone when the guard drops.
    pub fn play(board: &'a mut [Piece; 64], mv: &Move, color: Color) -> Self {
        let mut trial = Self::new(board);
        let moving = trial.board[mv.from as usize];
        let placed = match mv.kind {
            MoveKind::Promotion(kind) => Piece::new(color, kind),
            _ => moving,
        };
        if mv.kind == MoveKind::EnPassant {
            trial.set(mv.capture_square(), Piece::EMPTY);
        }
        trial.set(mv.from, Piece::EMPTY);
        trial.set(mv.to, placed);
        if let MoveKind::Castle(side) = mv.kind {
            let geometry = castle_geometry(color, side);
            let rook = trial.board[geometry.rook_from as usize];
            trial.set(geometry.rook_from, Piece::EMPTY);
            trial.set(geometry.rook_to, rook);
        }
        trial
    }

    /// Write a square, remembering its previous content.
    pub fn set(&mut self, square: Square, piece: Piece) {
        assert!(self.len < MAX_TOUCHED, "trial move touched more than {MAX_TOUCHED} squares");
        self.saved[self.len] = (square, self.board[square as usize]);
        self.len += 1;
        self.board[square as usize] = piece;
    }
}

impl Deref for TrialMove<'_> {
    type Target = [Piece; 64];

    fn deref(&self) -> &[Piece; 64] {
        &*self.board
    }
}

impl Drop for TrialMove<'_> {
    fn drop(&mut self) {
        for &(square, piece) in self.saved[..self.len].iter().rev() {
            self.board[square as usize] = piece;
        }
    }
}
