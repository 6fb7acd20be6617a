//! Square and move-text conversions.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! square indices. Column 0 is the h-file, so the file letter runs backwards
//! relative to the column number.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;

/// Convert a coordinate such as `"e4"` to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessErrors::InvalidAlgebraicString(square.to_owned()));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank_char = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank_char) {
        return Err(ChessErrors::InvalidAlgebraicString(square.to_owned()));
    }

    Ok(square_at(b'h' - file, rank_char - b'1'))
}

/// Convert a square index (`0..=63`) to a coordinate such as `"e4"`.
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    debug_assert!(square < 64, "square index out of bounds: {square}");
    let file_char = char::from(b'h' - column(square));
    let rank_char = char::from(b'1' + rank(square));
    format!("{file_char}{rank_char}")
}

/// Origin, destination and optional promotion letter of a textual move.
///
/// Accepts `e2e4`, `e2-e4`, `e7xd8Q` and the book form `(e2-e4)`.
pub fn parse_move_text(text: &str) -> ChessResult<(Square, Square, Option<PieceKind>)> {
    let invalid = || ChessErrors::InvalidAlgebraicString(text.to_owned());
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(trimmed);
    let compact: String = inner.chars().filter(|c| !matches!(c, '-' | 'x')).collect();

    if !compact.is_ascii() || !(4..=5).contains(&compact.len()) {
        return Err(invalid());
    }

    let from = algebraic_to_square(&compact[0..2])?;
    let to = algebraic_to_square(&compact[2..4])?;
    let promotion = match compact[4..].chars().next() {
        Some(letter) => Some(PieceKind::from_letter(letter).ok_or_else(invalid)?),
        None => None,
    };
    Ok((from, to, promotion))
}
