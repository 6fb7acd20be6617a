//! Position-to-FEN serializer.

use crate::game_state::chess_rules::CastleSide;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_to_algebraic;

pub fn generate_fen(position: &Position) -> String {
    let side_to_move = match position.side_to_move() {
        Color::White => "w",
        Color::Black => "b",
    };
    format!(
        "{} {} {} {} {} {}",
        generate_board_field(position.board()),
        side_to_move,
        generate_castling_field(position),
        generate_en_passant_field(position),
        position.fifty_counter(),
        position.fullmove_number()
    )
}

fn generate_board_field(board: &[Piece; 64]) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        // FEN runs a..h, which is column 7 down to 0.
        for col in (0..8u8).rev() {
            let piece = board[square_at(col, rank) as usize];
            if piece.is_empty() {
                empty_count += 1;
                continue;
            }
            if empty_count > 0 {
                out.push(char::from(b'0' + empty_count));
                empty_count = 0;
            }
            out.push(piece.symbol());
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(position: &Position) -> String {
    let mut out = String::new();
    for (color, side, letter) in [
        (Color::White, CastleSide::King, 'K'),
        (Color::White, CastleSide::Queen, 'Q'),
        (Color::Black, CastleSide::King, 'k'),
        (Color::Black, CastleSide::Queen, 'q'),
    ] {
        if position.can_castle(color, side) {
            out.push(letter);
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

/// The square the double-stepping pawn passed over.
fn generate_en_passant_field(position: &Position) -> String {
    let Some(pawn) = position.en_passant() else {
        return "-".to_owned();
    };
    let passed_rank = match position.side_to_move() {
        Color::Black => 2,
        Color::White => 5,
    };
    square_to_algebraic(square_at(column(pawn), passed_rank))
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_types::Position;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn round_trip_starting_position_fen() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(generate_fen(&Position::new()), start);
        let parsed = parse_fen(start).expect("starting FEN should parse");
        assert_eq!(generate_fen(&parsed), start);
    }

    #[test]
    fn tracks_moves_clocks_and_en_passant() {
        let mut position = Position::new();
        position.play("e2e4").expect("legal");
        assert_eq!(
            generate_fen(&position),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        position.play("g8f6").expect("legal");
        position.play("e1e2").expect("legal");
        assert_eq!(
            generate_fen(&position),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPPKPPP/RNBQ1BNR b kq - 2 2"
        );
    }

    #[test]
    fn round_trips_a_middlegame_record() {
        let kiwipete = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let parsed = parse_fen(kiwipete).expect("kiwipete should parse");
        assert_eq!(generate_fen(&parsed), kiwipete);
    }
}
