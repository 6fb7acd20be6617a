//! Terminal-oriented Unicode board renderer.
//!
//! Creates a human-readable board view for debugging, tests and diagnostics
//! in text environments.

use crate::game_state::chess_types::*;

/// Render the board with white at the bottom and the a-file on the left.
pub fn render_game_state(position: &Position) -> String {
    let mut out = render_board(position.board());
    out.push('\n');
    out.push_str(match position.side_to_move() {
        Color::White => "white to move",
        Color::Black => "black to move",
    });
    if position.is_design_mode() {
        out.push_str(" (design)");
    }
    out
}

/// Render a bare board array.
pub fn render_board(board: &[Piece; 64]) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        // Column 7 is the a-file.
        for col in (0..8u8).rev() {
            out.push(piece_to_unicode(board[square_at(col, rank) as usize]));
            if col > 0 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

fn piece_to_unicode(piece: Piece) -> char {
    let (Some(color), Some(kind)) = (piece.color(), piece.kind()) else {
        return '·';
    };
    match (color, kind) {
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::King) => '♔',
        (Color::Black, PieceKind::Pawn) => '♟',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::King) => '♚',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_rows_read_from_the_a_file() {
        let text = render_game_state(&Position::new());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[8], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");
        assert_eq!(lines[5], "4 · · · · · · · · 4");
        assert!(text.ends_with("white to move"));
    }
}
