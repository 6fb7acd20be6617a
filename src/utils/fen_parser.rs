//! FEN-to-Position parser.
//!
//! Builds a fully validated position from a Forsyth-Edwards Notation string:
//! board, side to move, castling rights, en-passant target and clocks. The
//! clocks may be omitted, in which case they default to `0 1`.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::config::RulesConfig;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> ChessResult<Position> {
    parse_fen_with_config(fen, RulesConfig::default())
}

pub fn parse_fen_with_config(fen: &str, config: RulesConfig) -> ChessResult<Position> {
    let invalid = |reason: &str| ChessErrors::InvalidFen(format!("{reason}: {fen:?}"));
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant square"))?;
    let halfmove = match parts.next() {
        Some(text) => text.parse::<u16>().map_err(|_| invalid("bad halfmove clock"))?,
        None => 0,
    };
    let fullmove = match parts.next() {
        Some(text) => text.parse::<u16>().map_err(|_| invalid("bad fullmove number"))?,
        None => 1,
    };
    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let board = parse_board(board_part).map_err(|reason| invalid(reason.as_str()))?;
    let side_to_move = match side_part {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(invalid("side to move must be 'w' or 'b'")),
    };
    let rights = parse_castling_rights(castling_part).map_err(|reason| invalid(reason.as_str()))?;
    let en_passant = parse_en_passant(en_passant_part, &board, side_to_move)?;

    Position::validate_board(&board, side_to_move)?;

    let mut position = Position::with_config(config);
    position.load_unchecked(
        board,
        side_to_move,
        Position::counters_from_rights(rights),
        en_passant,
        halfmove,
        fullmove,
    );
    tracing::debug!(fen, key = position.zobrist_key(), "position loaded from FEN");
    Ok(position)
}

fn parse_board(board_part: &str) -> Result<[Piece; 64], String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("board layout must contain 8 ranks".to_owned());
    }

    let mut board = [Piece::EMPTY; 64];
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("invalid empty-square count '{ch}'"));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err("board rank has too many files".to_owned());
                }
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| format!("invalid piece character '{ch}' in board layout"))?;
            if file >= 8 {
                return Err("board rank has too many files".to_owned());
            }
            // FEN lists files a..h; column 0 is the h-file.
            board[square_at(7 - file, board_rank) as usize] = piece;
            file += 1;
        }

        if file != 8 {
            return Err("board rank does not sum to 8 files".to_owned());
        }
    }
    Ok(board)
}

fn parse_castling_rights(castling_part: &str) -> Result<[[bool; 2]; 2], String> {
    let mut rights = [[false; 2]; 2];
    if castling_part == "-" {
        return Ok(rights);
    }
    for ch in castling_part.chars() {
        match ch {
            'K' => rights[0][0] = true,
            'Q' => rights[0][1] = true,
            'k' => rights[1][0] = true,
            'q' => rights[1][1] = true,
            _ => return Err(format!("invalid castling rights character '{ch}'")),
        }
    }
    Ok(rights)
}

/// Map the FEN target square (behind the pawn) to the pawn that double-stepped.
fn parse_en_passant(
    en_passant_part: &str,
    board: &[Piece; 64],
    side_to_move: Color,
) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    let target = algebraic_to_square(en_passant_part)?;
    let mover = side_to_move.opposite();
    let (target_rank, pawn_rank) = match mover {
        Color::White => (2, 3),
        Color::Black => (5, 4),
    };
    let pawn = square_at(column(target), pawn_rank);
    if rank(target) != target_rank || !board[pawn as usize].is(mover, PieceKind::Pawn) {
        return Err(ChessErrors::InvalidEnPassantColumn(column(target)));
    }
    Ok(Some(pawn))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };
    PieceKind::from_letter(ch).map(|kind| Piece::new(color, kind))
}
