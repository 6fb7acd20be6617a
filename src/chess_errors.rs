//! Errors used throughout the board engine.
//!
//! `ChessErrors` is the single recoverable error type of the crate. It covers
//! invalid external data: malformed saved games, design-mode boards that cannot
//! be closed, and move requests that do not match any legal move.
//!
//! Contract violations (writing a square outside design mode, popping an empty
//! history) and integrity mismatches are not represented here. They panic,
//! because they signal a bug in the caller rather than bad input.

use thiserror::Error;

use crate::game_state::chess_types::Square;

/// Unified recoverable error type for the board engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessErrors {
    /// Saved data did not start with the expected signature bytes.
    #[error("invalid saved-game signature {0:?}")]
    InvalidSignature([u8; 4]),

    /// Saved data was written by an unsupported format version.
    #[error("unsupported saved-game version {0}")]
    UnsupportedVersion(u16),

    /// Saved data ended before all declared fields were read.
    #[error("saved game truncated: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// A packed nibble held a code that is not a piece.
    ///
    /// Payload: (square, code).
    #[error("invalid piece code {1} on square {0}")]
    InvalidPieceCode(Square, u8),

    /// The state-flags word had reserved bits set or contradicted the board.
    #[error("invalid state flags {0:#x}")]
    InvalidStateFlags(u32),

    /// The flags named an en-passant column with no pawn that could have just
    /// made a double step there.
    #[error("invalid en-passant column {0}")]
    InvalidEnPassantColumn(u8),

    /// A board must hold exactly one king of each color.
    ///
    /// Payload: (white kings, black kings).
    #[error("board must hold exactly one king per side, found {0} white and {1} black")]
    WrongKingCount(u8, u8),

    /// The side that just moved would still be in check.
    #[error("the side not to move is in check")]
    OpponentInCheck,

    /// A move kind byte in saved data was not recognised.
    #[error("invalid move kind byte {0}")]
    InvalidMoveKind(u8),

    /// A replayed or requested move is not legal in the current position.
    #[error("illegal move {0}")]
    IllegalMove(String),

    /// A FEN record was malformed.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// The saved-at field is outside the representable date range.
    #[error("invalid saved-game timestamp {0}")]
    InvalidTimestamp(i64),

    /// Square text such as `e4` failed to parse.
    #[error("invalid algebraic square {0:?}")]
    InvalidAlgebraicString(String),

    /// The engine is in design mode and cannot play moves.
    #[error("position is in design mode")]
    InDesignMode,
}

/// Result alias for board engine operations.
pub type ChessResult<T> = Result<T, ChessErrors>;
