//! Binary saved-game format.
//!
//! A saved game is the base position (packed board plus state flags and
//! clocks) followed by the moves played from it, so the game is rebuilt by
//! replaying rather than by trusting a stored final position. Layout, all
//! integers little-endian:
//!
//! | field         | type          |
//! |---------------|---------------|
//! | signature     | `b"PLBG"`     |
//! | version       | `u16` (1)     |
//! | saved at      | `i64` seconds |
//! | base board    | 4 × `u64`     |
//! | base flags    | `u32`         |
//! | fifty counter | `u16`         |
//! | full move     | `u16`         |
//! | move count    | `u32`         |
//! | moves         | `from u8, to u8, kind u8` each |

use chrono::{DateTime, Utc};

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::CastleSide;
use crate::game_state::chess_types::*;
use crate::game_state::config::RulesConfig;
use crate::history::packed_position::{PackedPosition, StateFlags};
use crate::moves::chess_move::MoveKind;
use crate::utils::algebraic::square_to_algebraic;

const SIGNATURE: &[u8; 4] = b"PLBG";
const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 4 + 2 + 8 + 32 + 4 + 2 + 2 + 4;

/// One replayable ply: enough to pick the generated move again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedMove {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedGame {
    pub saved_at: DateTime<Utc>,
    pub base: PackedPosition,
    pub base_flags: StateFlags,
    pub base_fifty: u16,
    pub base_fullmove: u16,
    pub moves: Vec<SavedMove>,
}

impl SavedGame {
    /// Capture the base position and the moves up to the stack cursor.
    pub fn from_position(position: &Position) -> Self {
        let (base, base_flags) = position.base();
        SavedGame {
            saved_at: Utc::now(),
            base,
            base_flags,
            base_fifty: position.base_fifty(),
            base_fullmove: position.base_fullmove(),
            moves: position
                .stack()
                .played()
                .iter()
                .map(|mv| SavedMove {
                    from: mv.from,
                    to: mv.to,
                    kind: mv.kind,
                })
                .collect(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.moves.len() * 3);
        out.extend_from_slice(SIGNATURE);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&self.saved_at.timestamp().to_le_bytes());
        for word in self.base.words {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.extend_from_slice(&self.base_flags.bits().to_le_bytes());
        out.extend_from_slice(&self.base_fifty.to_le_bytes());
        out.extend_from_slice(&self.base_fullmove.to_le_bytes());
        out.extend_from_slice(&(self.moves.len() as u32).to_le_bytes());
        for mv in &self.moves {
            out.extend_from_slice(&[mv.from, mv.to, mv.kind.to_byte()]);
        }
        out
    }

    /// Decode and check the fixed-format fields. Board legality and the move
    /// list are checked by `restore`.
    pub fn from_bytes(bytes: &[u8]) -> ChessResult<Self> {
        Self::decode(bytes).inspect_err(|err| tracing::warn!(%err, "saved game rejected"))
    }

    fn decode(bytes: &[u8]) -> ChessResult<Self> {
        let mut reader = ByteReader::new(bytes);

        let signature: [u8; 4] = reader.array()?;
        if &signature != SIGNATURE {
            return Err(ChessErrors::InvalidSignature(signature));
        }
        let version = reader.u16()?;
        if version != FORMAT_VERSION {
            return Err(ChessErrors::UnsupportedVersion(version));
        }
        let seconds = reader.i64()?;
        let saved_at =
            DateTime::from_timestamp(seconds, 0).ok_or(ChessErrors::InvalidTimestamp(seconds))?;

        let mut base = PackedPosition::default();
        for word in &mut base.words {
            *word = reader.u64()?;
        }
        base.unpack()?;
        let base_flags = StateFlags::from_bits(reader.u32()?)?;
        let base_fifty = reader.u16()?;
        let base_fullmove = reader.u16()?;

        let count = reader.u32()? as usize;
        let mut moves = Vec::with_capacity(count.min(bytes.len() / 3));
        for _ in 0..count {
            let [from, to, kind] = reader.array()?;
            if from > 63 || to > 63 {
                return Err(ChessErrors::IllegalMove(format!("square out of range {from}->{to}")));
            }
            moves.push(SavedMove {
                from,
                to,
                kind: MoveKind::from_byte(kind)?,
            });
        }

        Ok(SavedGame {
            saved_at,
            base,
            base_flags,
            base_fifty,
            base_fullmove,
            moves,
        })
    }

    pub fn restore(&self) -> ChessResult<Position> {
        self.restore_with_config(RulesConfig::default())
    }

    /// Rebuild the base position, then replay every move through the legal
    /// move generator.
    pub fn restore_with_config(&self, config: RulesConfig) -> ChessResult<Position> {
        self.rebuild(config)
            .inspect_err(|err| tracing::warn!(%err, "saved game could not be restored"))
    }

    fn rebuild(&self, config: RulesConfig) -> ChessResult<Position> {
        let board = self.base.unpack()?;
        let side = self.base_flags.side_to_move();
        Position::validate_board(&board, side)?;

        let en_passant = match self.base_flags.en_passant_column() {
            None => None,
            Some(col) => {
                let passed = side.opposite();
                let pawn_rank = match passed {
                    Color::White => 3,
                    Color::Black => 4,
                };
                let pawn = square_at(col, pawn_rank);
                if !board[pawn as usize].is(passed, PieceKind::Pawn) {
                    return Err(ChessErrors::InvalidEnPassantColumn(col));
                }
                Some(pawn)
            }
        };

        let rights = [Color::White, Color::Black].map(|color| {
            [CastleSide::King, CastleSide::Queen].map(|castle| self.base_flags.can_castle(color, castle))
        });

        let mut position = Position::with_config(config);
        position.load_unchecked(
            board,
            side,
            Position::counters_from_rights(rights),
            en_passant,
            self.base_fifty,
            self.base_fullmove,
        );
        // Rights or an en-passant column the board cannot support.
        let rebuilt = position.state_flags();
        if rebuilt != self.base_flags {
            return Err(match self.base_flags.en_passant_column() {
                Some(col) if rebuilt.en_passant_column().is_none() => {
                    ChessErrors::InvalidEnPassantColumn(col)
                }
                _ => ChessErrors::InvalidStateFlags(self.base_flags.bits()),
            });
        }

        for saved in &self.moves {
            let mv = position
                .legal_moves()
                .into_iter()
                .find(|mv| mv.from == saved.from && mv.to == saved.to && mv.kind == saved.kind)
                .ok_or_else(|| {
                    ChessErrors::IllegalMove(format!(
                        "{}{}",
                        square_to_algebraic(saved.from),
                        square_to_algebraic(saved.to)
                    ))
                })?;
            position.apply_move(&mv);
        }
        tracing::debug!(
            moves = self.moves.len(),
            key = position.zobrist_key(),
            "saved game restored"
        );
        Ok(position)
    }
}

/// Little-endian cursor that reports truncation as `ChessErrors::Truncated`.
struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        ByteReader { bytes, offset: 0 }
    }

    fn array<const N: usize>(&mut self) -> ChessResult<[u8; N]> {
        let end = self.offset + N;
        let slice = self.bytes.get(self.offset..end).ok_or(ChessErrors::Truncated {
            offset: self.offset,
            needed: N,
        })?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.offset = end;
        Ok(out)
    }

    fn u16(&mut self) -> ChessResult<u16> {
        self.array().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> ChessResult<u32> {
        self.array().map(u32::from_le_bytes)
    }

    fn u64(&mut self) -> ChessResult<u64> {
        self.array().map(u64::from_le_bytes)
    }

    fn i64(&mut self) -> ChessResult<i64> {
        self.array().map(i64::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fen_generator::generate_fen;
    use crate::utils::fen_parser::parse_fen;

    fn played_game() -> Position {
        let mut position = Position::new();
        for text in ["e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6"] {
            position.play(text).expect("opening move should be legal");
        }
        position
    }

    #[test]
    fn restores_the_same_game() {
        let position = played_game();
        let saved = SavedGame::from_position(&position);
        let bytes = saved.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN + 8 * 3);

        let decoded = SavedGame::from_bytes(&bytes).expect("saved game should decode");
        assert_eq!(decoded.moves, saved.moves);
        assert_eq!(decoded.saved_at.timestamp(), saved.saved_at.timestamp());

        let restored = decoded.restore().expect("saved game should restore");
        assert_eq!(restored.zobrist_key(), position.zobrist_key());
        assert_eq!(restored.stack().played(), position.stack().played());
        assert_eq!(generate_fen(&restored), generate_fen(&position));
    }

    #[test]
    fn saves_only_moves_before_the_cursor() {
        let mut position = played_game();
        position.undo_last();
        position.undo_last();
        let restored = SavedGame::from_position(&position).restore().expect("restore");
        assert_eq!(restored.stack().played().len(), 6);
        assert!(!restored.stack().can_redo());
        assert_eq!(restored.zobrist_key(), position.zobrist_key());
    }

    #[test]
    fn keeps_a_fen_base_with_clocks_and_en_passant() {
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 12 40";
        let position = parse_fen(fen).expect("fixture fen");
        let restored = SavedGame::from_position(&position).restore().expect("restore");
        assert_eq!(generate_fen(&restored), fen);
        assert_eq!(restored.en_passant(), position.en_passant());
    }

    #[test]
    fn rejects_damaged_headers() {
        let bytes = SavedGame::from_position(&played_game()).to_bytes();

        let mut bad_signature = bytes.clone();
        bad_signature[0] = b'X';
        assert!(matches!(
            SavedGame::from_bytes(&bad_signature),
            Err(ChessErrors::InvalidSignature(_))
        ));

        let mut bad_version = bytes.clone();
        bad_version[4] = 9;
        assert_eq!(
            SavedGame::from_bytes(&bad_version).err(),
            Some(ChessErrors::UnsupportedVersion(9))
        );

        assert_eq!(
            SavedGame::from_bytes(&bytes[..HEADER_LEN + 4]).err(),
            Some(ChessErrors::Truncated { offset: HEADER_LEN + 3, needed: 3 })
        );
        assert!(matches!(
            SavedGame::from_bytes(&bytes[..10]),
            Err(ChessErrors::Truncated { offset: 6, needed: 8 })
        ));
    }

    #[test]
    fn rejects_bad_board_and_flags() {
        let saved = SavedGame::from_position(&Position::new());

        let mut bad_code = saved.to_bytes();
        // Square 0 sits in the low nibble of the first board byte; code 7 is unused.
        bad_code[14] = (bad_code[14] & 0xF0) | 7;
        assert_eq!(
            SavedGame::from_bytes(&bad_code).err(),
            Some(ChessErrors::InvalidPieceCode(0, 7))
        );

        let mut reserved = saved.to_bytes();
        reserved[46 + 1] |= 0x80;
        assert!(matches!(
            SavedGame::from_bytes(&reserved),
            Err(ChessErrors::InvalidStateFlags(_))
        ));

        let mut no_kings = saved.clone();
        no_kings.base = PackedPosition::default();
        assert_eq!(no_kings.restore().err(), Some(ChessErrors::WrongKingCount(0, 0)));

        let mut phantom_pawn = saved.clone();
        phantom_pawn.base_flags =
            StateFlags::new(Color::White, [[true; 2]; 2], Some(3));
        assert_eq!(
            phantom_pawn.restore().err(),
            Some(ChessErrors::InvalidEnPassantColumn(3))
        );

        let bare = parse_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("fixture fen");
        let mut phantom_rights = SavedGame::from_position(&bare);
        phantom_rights.base_flags = StateFlags::new(Color::White, [[true, false], [false, false]], None);
        assert!(matches!(
            phantom_rights.restore(),
            Err(ChessErrors::InvalidStateFlags(_))
        ));
    }

    #[test]
    fn rejects_an_illegal_replay() {
        let mut saved = SavedGame::from_position(&played_game());
        saved.moves[2].to = saved.moves[2].from;
        assert!(matches!(saved.restore(), Err(ChessErrors::IllegalMove(_))));
    }
}
