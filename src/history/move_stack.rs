//! Linear undo/redo log of applied moves.
//!
//! Independent of the draw bookkeeping in `MoveHistory`: this log exists to
//! navigate a game record, e.g. stepping back and forth through a finished game.

use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Default)]
pub struct MoveStack {
    moves: Vec<Move>,
    cursor: usize,
}

impl MoveStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move at the cursor, dropping any redo entries beyond it.
    pub fn push(&mut self, mv: Move) {
        self.moves.truncate(self.cursor);
        self.moves.push(mv);
        self.cursor += 1;
    }

    /// Move the cursor back one ply, returning the move to undo.
    pub fn step_back(&mut self) -> Option<Move> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.moves[self.cursor])
    }

    /// Move the cursor forward one ply, returning the move to redo.
    pub fn step_forward(&mut self) -> Option<Move> {
        let mv = self.peek_redo()?;
        self.cursor += 1;
        Some(mv)
    }

    #[inline]
    pub fn peek_undo(&self) -> Option<Move> {
        self.cursor.checked_sub(1).map(|i| self.moves[i])
    }

    #[inline]
    pub fn peek_redo(&self) -> Option<Move> {
        self.moves.get(self.cursor).copied()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.moves.len()
    }

    /// Moves up to the cursor, oldest first.
    #[inline]
    pub fn played(&self) -> &[Move] {
        &self.moves[..self.cursor]
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.moves.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Piece;
    use crate::moves::chess_move::MoveKind;

    fn mv(from: u8, to: u8) -> Move {
        Move::new(from, to, Piece::EMPTY, MoveKind::Normal)
    }

    #[test]
    fn undo_then_redo_walks_the_same_moves() {
        let mut stack = MoveStack::new();
        stack.push(mv(1, 2));
        stack.push(mv(3, 4));
        assert_eq!(stack.step_back(), Some(mv(3, 4)));
        assert!(stack.can_redo());
        assert_eq!(stack.step_forward(), Some(mv(3, 4)));
        assert!(!stack.can_redo());
        assert_eq!(stack.played(), &[mv(1, 2), mv(3, 4)]);
    }

    #[test]
    fn push_truncates_redo_entries() {
        let mut stack = MoveStack::new();
        stack.push(mv(1, 2));
        stack.push(mv(3, 4));
        stack.push(mv(5, 6));
        stack.step_back();
        stack.step_back();
        stack.push(mv(7, 8));
        assert_eq!(stack.played(), &[mv(1, 2), mv(7, 8)]);
        assert_eq!(stack.peek_redo(), None);
        assert_eq!(stack.peek_undo(), Some(mv(7, 8)));
    }

    #[test]
    fn stepping_past_either_end_is_a_no_op() {
        let mut stack = MoveStack::new();
        assert_eq!(stack.step_back(), None);
        assert_eq!(stack.step_forward(), None);
        stack.push(mv(1, 2));
        stack.clear();
        assert!(!stack.can_undo());
        assert_eq!(stack.cursor(), 0);
    }
}
