//! Incremental make/unmake of moves on a `Position`.
//!
//! Every board write goes through `write_square`, and the Zobrist key is
//! folded once per ply with the batched updates: two squares for a plain move,
//! three for en passant, four for castling. The same touched-origin rule bumps
//! castle counters on apply and releases them on undo.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::{castle_counter_for, castle_geometry};
use crate::game_state::chess_types::*;
use crate::history::move_history::RepeatResult;
use crate::moves::chess_move::{Move, MoveKind};
use crate::search::zobrist;
use crate::utils::algebraic::{parse_move_text, square_to_algebraic};

/// Castle counter slots touched by `mv`. A slot appears at most once.
fn touched_counters(mv: &Move, color: Color) -> impl Iterator<Item = usize> {
    let rook_from = match mv.kind {
        MoveKind::Castle(side) => Some(castle_geometry(color, side).rook_from),
        _ => None,
    };
    let from = castle_counter_for(mv.from);
    let to = castle_counter_for(mv.to);
    let rook = rook_from.and_then(castle_counter_for);
    [from, to, rook].into_iter().flatten()
}

impl Position {
    /// Play a legal move for the side to move and record it.
    ///
    /// `mv` must come from `enumerate` on this position; feeding anything else
    /// corrupts the incremental state.
    pub fn apply_move(&mut self, mv: &Move) -> RepeatResult {
        assert!(!self.design_mode, "apply_move called in design mode");
        let result = self.play_recorded(mv);
        self.stack.push(*mv);
        if self.config.verify_integrity {
            self.check_integrity();
        }
        result
    }

    /// Take back `mv`, which must be the most recently applied move. The move
    /// stays on the stack for `redo`.
    pub fn undo_move(&mut self, mv: &Move) {
        assert!(!self.design_mode, "undo_move called in design mode");
        assert_eq!(
            self.stack.peek_undo().as_ref(),
            Some(mv),
            "undo_move must reverse the last applied move"
        );
        self.history.remove_last();
        self.unmake(mv);
        self.stack.step_back();
        if self.config.verify_integrity {
            self.check_integrity();
        }
    }

    /// Undo the last move on the stack, if any.
    pub fn undo_last(&mut self) -> Option<Move> {
        let mv = self.stack.peek_undo()?;
        self.undo_move(&mv);
        Some(mv)
    }

    /// Replay the next move beyond the stack cursor, if any.
    pub fn redo(&mut self) -> Option<RepeatResult> {
        assert!(!self.design_mode, "redo called in design mode");
        let mv = self.stack.peek_redo()?;
        let result = self.play_recorded(&mv);
        self.stack.step_forward();
        if self.config.verify_integrity {
            self.check_integrity();
        }
        Some(result)
    }

    /// Resolve a square pair to the generated legal move. A promotion without
    /// an explicit piece defaults to a queen.
    pub fn find_legal(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<Move> {
        if self.design_mode {
            return Err(ChessErrors::InDesignMode);
        }
        let wanted = promotion.unwrap_or(PieceKind::Queen);
        self.legal_moves()
            .into_iter()
            .filter(|mv| mv.from == from && mv.to == to)
            .find(|mv| mv.promotion().map_or(promotion.is_none(), |kind| kind == wanted))
            .ok_or_else(|| {
                let mut text = format!("{}{}", square_to_algebraic(from), square_to_algebraic(to));
                if let Some(kind) = promotion {
                    text.push(kind.letter());
                }
                ChessErrors::IllegalMove(text)
            })
    }

    /// Parse and play a textual move such as `e2e4` or `e7xd8Q`.
    pub fn play(&mut self, text: &str) -> ChessResult<RepeatResult> {
        let (from, to, promotion) = parse_move_text(text)?;
        let mv = self.find_legal(from, to, promotion)?;
        Ok(self.apply_move(&mv))
    }

    /// Make the move and push the resulting position into the history.
    fn play_recorded(&mut self, mv: &Move) -> RepeatResult {
        let moving = self.board[mv.from as usize];
        self.make(mv);
        let irreversible = moving.kind() == Some(PieceKind::Pawn) || mv.is_capture();
        self.history
            .add(self.packed, self.state_flags(), self.zobrist_key, irreversible)
    }

    fn make(&mut self, mv: &Move) {
        let color = self.side_to_move;
        let moving = self.board[mv.from as usize];
        debug_assert!(moving.is_color(color), "no {color:?} piece on {}", mv.from);

        for slot in touched_counters(mv, color) {
            self.castle_counters[slot] = self.castle_counters[slot].saturating_add(1);
        }
        self.en_passant_stack.push(self.en_passant);

        match mv.kind {
            MoveKind::Castle(side) => {
                let geometry = castle_geometry(color, side);
                let rook = self.board[geometry.rook_from as usize];
                self.zobrist_key = zobrist::update4(
                    self.zobrist_key,
                    [
                        (geometry.king_from, moving, Piece::EMPTY),
                        (geometry.king_to, Piece::EMPTY, moving),
                        (geometry.rook_from, rook, Piece::EMPTY),
                        (geometry.rook_to, Piece::EMPTY, rook),
                    ],
                );
                self.write_square(geometry.king_from, Piece::EMPTY);
                self.write_square(geometry.king_to, moving);
                self.write_square(geometry.rook_from, Piece::EMPTY);
                self.write_square(geometry.rook_to, rook);
            }
            MoveKind::EnPassant => {
                let victim_square = mv.capture_square();
                self.zobrist_key = zobrist::update2(
                    self.zobrist_key,
                    [
                        (mv.from, moving, Piece::EMPTY),
                        (mv.to, Piece::EMPTY, moving),
                    ],
                );
                self.zobrist_key =
                    zobrist::update(self.zobrist_key, victim_square, mv.captured, Piece::EMPTY);
                self.write_square(mv.from, Piece::EMPTY);
                self.write_square(mv.to, moving);
                self.write_square(victim_square, Piece::EMPTY);
            }
            _ => {
                let placed = match mv.kind {
                    MoveKind::Promotion(kind) => Piece::new(color, kind),
                    _ => moving,
                };
                self.zobrist_key = zobrist::update2(
                    self.zobrist_key,
                    [
                        (mv.from, moving, Piece::EMPTY),
                        (mv.to, mv.captured, placed),
                    ],
                );
                self.write_square(mv.from, Piece::EMPTY);
                self.write_square(mv.to, placed);
            }
        }

        self.en_passant = (mv.kind == MoveKind::DoubleStep).then_some(mv.to);
        self.side_to_move = color.opposite();
    }

    fn unmake(&mut self, mv: &Move) {
        let color = self.side_to_move.opposite();
        self.side_to_move = color;

        let landed = self.board[mv.to as usize];
        let moving = match mv.kind {
            MoveKind::Promotion(_) => Piece::new(color, PieceKind::Pawn),
            _ => landed,
        };

        match mv.kind {
            MoveKind::Castle(side) => {
                let geometry = castle_geometry(color, side);
                let rook = self.board[geometry.rook_to as usize];
                self.zobrist_key = zobrist::update4(
                    self.zobrist_key,
                    [
                        (geometry.king_to, landed, Piece::EMPTY),
                        (geometry.king_from, Piece::EMPTY, landed),
                        (geometry.rook_to, rook, Piece::EMPTY),
                        (geometry.rook_from, Piece::EMPTY, rook),
                    ],
                );
                self.write_square(geometry.king_to, Piece::EMPTY);
                self.write_square(geometry.king_from, landed);
                self.write_square(geometry.rook_to, Piece::EMPTY);
                self.write_square(geometry.rook_from, rook);
            }
            MoveKind::EnPassant => {
                let victim_square = mv.capture_square();
                self.zobrist_key = zobrist::update2(
                    self.zobrist_key,
                    [
                        (mv.to, landed, Piece::EMPTY),
                        (mv.from, Piece::EMPTY, moving),
                    ],
                );
                self.zobrist_key =
                    zobrist::update(self.zobrist_key, victim_square, Piece::EMPTY, mv.captured);
                self.write_square(mv.to, Piece::EMPTY);
                self.write_square(mv.from, moving);
                self.write_square(victim_square, mv.captured);
            }
            _ => {
                self.zobrist_key = zobrist::update2(
                    self.zobrist_key,
                    [
                        (mv.to, landed, mv.captured),
                        (mv.from, Piece::EMPTY, moving),
                    ],
                );
                self.write_square(mv.to, mv.captured);
                self.write_square(mv.from, moving);
            }
        }

        for slot in touched_counters(mv, color) {
            self.castle_counters[slot] = self.castle_counters[slot].saturating_sub(1);
        }
        self.en_passant = self
            .en_passant_stack
            .pop()
            .expect("en-passant stack underflow: undo without a matching apply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::{CastleSide, WHITE_KING_COUNTER, WHITE_KING_ROOK_COUNTER};
    use crate::history::packed_position::PackedPosition;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("test square should parse")
    }

    /// Everything apply/undo must restore.
    fn snapshot(p: &Position) -> ([Piece; 64], [u8; 16], u64, PackedPosition, [u16; 6], Option<Square>, Color) {
        (
            p.board,
            p.piece_counts,
            p.zobrist_key,
            p.packed,
            p.castle_counters,
            p.en_passant,
            p.side_to_move,
        )
    }

    fn assert_round_trip(position: &mut Position, mv: Move) {
        let before = snapshot(position);
        position.apply_move(&mv);
        position.check_integrity();
        position.undo_move(&mv);
        position.check_integrity();
        assert_eq!(snapshot(position), before, "round trip of {mv}");
    }

    #[test]
    fn every_move_kind_round_trips() {
        // Kiwipete plus an en-passant target on a5 and a promotable pawn on g7.
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/Pp2P3/2N2Q1p/1PPBBPPP/R3K2R b KQkq a3 0 1",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N w - - 0 1",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        ];
        for fen in fens {
            let mut position = parse_fen(fen).expect("fixture fen should parse");
            for mv in position.legal_moves() {
                assert_round_trip(&mut position, mv);
            }
        }
    }

    #[test]
    fn castling_moves_king_and_rook() {
        let mut position =
            parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("castling fixture");
        let mv = position
            .find_legal(E1, G1, None)
            .expect("kingside castle is legal");
        assert_eq!(mv.kind, MoveKind::Castle(CastleSide::King));
        position.apply_move(&mv);
        assert!(position.piece_at(G1).is(Color::White, PieceKind::King));
        assert!(position.piece_at(F1).is(Color::White, PieceKind::Rook));
        assert!(position.piece_at(H1).is_empty());
        assert_eq!(position.king_square(Color::White), G1);
        assert_eq!(position.castle_counters()[WHITE_KING_COUNTER], 1);
        assert_eq!(position.castle_counters()[WHITE_KING_ROOK_COUNTER], 1);
        assert!(!position.state_flags().can_castle(Color::White, CastleSide::Queen));
    }

    #[test]
    fn king_that_moved_and_returned_cannot_castle() {
        let mut position =
            parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("castling fixture");
        for text in ["e1f1", "e8f8", "f1e1", "f8e8"] {
            position.play(text).expect("king shuffle is legal");
        }
        assert!(!position.can_castle(Color::White, CastleSide::King));
        assert!(!position.can_castle(Color::Black, CastleSide::Queen));
        assert!(position.find_legal(E1, G1, None).is_err());

        // Undoing the shuffle restores the right.
        for _ in 0..4 {
            position.undo_last().expect("four moves to undo");
        }
        assert!(position.can_castle(Color::White, CastleSide::King));
    }

    #[test]
    fn capturing_an_unmoved_rook_removes_that_right() {
        let mut position =
            parse_fen("r3k2r/8/8/8/8/8/8/R3K1BR b KQkq - 0 1").expect("fixture");
        position.play("h8h1").expect("rook takes rook");
        assert!(!position.can_castle(Color::White, CastleSide::King));
        assert!(!position.can_castle(Color::Black, CastleSide::King));
        assert!(position.can_castle(Color::White, CastleSide::Queen));
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut position =
            parse_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").expect("fixture");
        position.play("d7d5").expect("double step");
        assert_eq!(position.en_passant(), Some(sq("d5")));
        assert_eq!(position.state_flags().en_passant_column(), Some(column(sq("d5"))));
        position.play("e5d6").expect("en passant capture");
        assert!(position.piece_at(sq("d5")).is_empty());
        assert!(position.piece_at(sq("d6")).is(Color::White, PieceKind::Pawn));
        assert_eq!(position.count_of(Piece::new(Color::Black, PieceKind::Pawn)), 0);
        assert_eq!(position.fifty_counter(), 0);

        position.undo_last();
        assert!(position.piece_at(sq("d5")).is(Color::Black, PieceKind::Pawn));
        assert_eq!(position.en_passant(), Some(sq("d5")));
    }

    #[test]
    fn dead_double_step_leaves_no_en_passant_flag() {
        let mut position = Position::new();
        position.play("e2e4").expect("opening move");
        assert_eq!(position.en_passant(), Some(sq("e4")));
        assert_eq!(position.state_flags().en_passant_column(), None);
    }

    #[test]
    fn promotion_variants_place_the_chosen_piece() {
        for (letter, kind) in [('Q', PieceKind::Queen), ('N', PieceKind::Knight), ('P', PieceKind::Pawn)] {
            let mut position = parse_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").expect("fixture");
            position
                .play(&format!("e7e8{letter}"))
                .expect("promotion is legal");
            assert!(position.piece_at(sq("e8")).is(Color::White, kind));
        }
        let mut position = parse_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").expect("fixture");
        let mv = position.find_legal(sq("e7"), sq("e8"), None).expect("default promotion");
        assert_eq!(mv.promotion(), Some(PieceKind::Queen));
    }

    #[test]
    fn redo_replays_the_undone_move() {
        let mut position = Position::new();
        position.play("g1f3").expect("knight out");
        position.play("g8f6").expect("knight out");
        let key = position.zobrist_key();
        assert!(position.undo_last().is_some());
        assert!(position.undo_last().is_some());
        assert!(position.undo_last().is_none());
        assert_eq!(position.redo(), Some(RepeatResult::None));
        assert_eq!(position.redo(), Some(RepeatResult::None));
        assert_eq!(position.redo(), None);
        assert_eq!(position.zobrist_key(), key);
        assert_eq!(position.stack().played().len(), 2);
        assert_eq!(position.history().len(), 3);
    }

    #[test]
    fn illegal_text_moves_are_rejected() {
        let mut position = Position::new();
        assert!(matches!(position.play("e2e5"), Err(ChessErrors::IllegalMove(_))));
        assert!(matches!(position.play("zz"), Err(ChessErrors::InvalidAlgebraicString(_))));
        position.begin_design();
        assert_eq!(position.play("e2e4"), Err(ChessErrors::InDesignMode));
    }

    #[test]
    #[should_panic(expected = "last applied move")]
    fn undoing_out_of_order_panics() {
        let mut position = Position::new();
        let first = position.find_legal(sq("e2"), sq("e4"), None).expect("legal");
        position.apply_move(&first);
        position.play("e7e5").expect("legal");
        position.undo_move(&first);
    }

    #[test]
    fn saturated_castle_counter_stays_disabled() {
        let mut position =
            parse_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").expect("fixture fen should parse");
        position.castle_counters[WHITE_KING_COUNTER] = u16::MAX;
        position.play("e1f1").expect("king step is legal");
        assert_eq!(position.castle_counters()[WHITE_KING_COUNTER], u16::MAX);
        position.play("e8d8").expect("king step is legal");
        position.play("f1e1").expect("king step is legal");
        assert!(!position.can_castle(Color::White, CastleSide::King));
        while position.undo_last().is_some() {}
        assert_ne!(position.castle_counters()[WHITE_KING_COUNTER], 0);
    }
}
