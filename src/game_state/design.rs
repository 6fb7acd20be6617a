//! Free placement of pieces for setting up arbitrary positions.
//!
//! While in design mode the usual invariants are suspended: any square can be
//! written, kings may be missing, and no moves can be played. Closing the
//! design validates the board and starts a fresh game from it.

use crate::chess_errors::ChessResult;
use crate::game_state::chess_types::*;

impl Position {
    /// Enter design mode, keeping the current board as the starting sketch.
    pub fn begin_design(&mut self) {
        self.design_mode = true;
        tracing::debug!("design mode entered");
    }

    /// Write one square. Only valid in design mode.
    pub fn set_square(&mut self, square: Square, piece: Piece) {
        assert!(
            self.design_mode,
            "square {square} written outside design mode"
        );
        self.put_piece(square, piece);
    }

    /// Empty every square. Only valid in design mode.
    pub fn clear_board(&mut self) {
        for sq in 0..64 {
            self.set_square(sq, Piece::EMPTY);
        }
    }

    /// Validate the sketch and make it the new base position with `side` to
    /// move. On error the position stays in design mode so the caller can fix
    /// the board and retry.
    pub fn close_design(&mut self, side: Color) -> ChessResult<()> {
        assert!(self.design_mode, "close_design called outside design mode");
        if let Err(err) = Self::validate_board(&self.board, side) {
            tracing::debug!(%err, "design rejected");
            return Err(err);
        }

        let counters = Self::counters_from_occupancy(&self.board);
        self.design_mode = false;
        self.load_unchecked(self.board, side, counters, None, 0, 1);
        tracing::debug!(key = self.zobrist_key, ?side, "design closed");
        Ok(())
    }
}
