//! Mailbox position: the mutable state every other subsystem works on.
//!
//! The board is a flat `[Piece; 64]`. Piece counts, cached king squares, the
//! Zobrist key and the packed mirror are kept in lock-step with it by the
//! write primitives in this file; nothing recomputes them wholesale except
//! a full load.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::{castle_geometry, CastleSide, CASTLE_ORIGINS, STARTING_BOARD};
use crate::game_state::chess_types::*;
use crate::game_state::config::RulesConfig;
use crate::history::move_history::MoveHistory;
use crate::history::move_stack::MoveStack;
use crate::history::packed_position::{PackedPosition, StateFlags};
use crate::search::zobrist;

#[derive(Debug, Clone)]
pub struct Position {
    pub(crate) board: [Piece; 64],
    pub(crate) king_square: [Square; 2],
    /// Squares holding each piece code; slot 0 counts empty squares.
    pub(crate) piece_counts: [u8; 16],
    /// Times each castling piece's origin was touched, in `CASTLE_ORIGINS` order.
    pub(crate) castle_counters: [u16; 6],
    /// Pawn that just made a double step.
    pub(crate) en_passant: Option<Square>,
    pub(crate) en_passant_stack: Vec<Option<Square>>,
    pub(crate) side_to_move: Color,
    pub(crate) zobrist_key: u64,
    pub(crate) packed: PackedPosition,
    pub(crate) history: MoveHistory,
    pub(crate) stack: MoveStack,
    pub(crate) design_mode: bool,
    pub(crate) config: RulesConfig,
    /// Starting point the move stack replays from.
    pub(crate) base: PackedPosition,
    pub(crate) base_flags: StateFlags,
    pub(crate) base_fifty: u16,
    pub(crate) base_fullmove: u16,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Standard starting position with default rules.
    pub fn new() -> Self {
        Self::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        let mut position = Position {
            board: [Piece::EMPTY; 64],
            king_square: [E1, E8],
            piece_counts: [0; 16],
            castle_counters: [0; 6],
            en_passant: None,
            en_passant_stack: Vec::with_capacity(256),
            side_to_move: Color::White,
            zobrist_key: 0,
            packed: PackedPosition::default(),
            history: MoveHistory::new(),
            stack: MoveStack::new(),
            design_mode: false,
            config,
            base: PackedPosition::default(),
            base_flags: StateFlags::default(),
            base_fifty: 0,
            base_fullmove: 1,
        };
        position.reset();
        position
    }

    /// Back to the standard starting position, dropping all history.
    pub fn reset(&mut self) {
        self.design_mode = false;
        self.load_unchecked(STARTING_BOARD, Color::White, [0; 6], None, 0, 1);
        tracing::debug!(key = self.zobrist_key, "position reset to standard start");
    }

    /// Replace the whole state. The board must already be validated.
    pub(crate) fn load_unchecked(
        &mut self,
        board: [Piece; 64],
        side_to_move: Color,
        castle_counters: [u16; 6],
        en_passant: Option<Square>,
        fifty: u16,
        fullmove: u16,
    ) {
        self.board = board;
        self.piece_counts = [0; 16];
        for (sq, &piece) in board.iter().enumerate() {
            self.piece_counts[piece.index()] += 1;
            if piece.kind() == Some(PieceKind::King) {
                if let Some(color) = piece.color() {
                    self.king_square[color.index()] = sq as Square;
                }
            }
        }
        self.castle_counters = castle_counters;
        self.en_passant = en_passant;
        self.en_passant_stack.clear();
        self.side_to_move = side_to_move;
        self.zobrist_key = zobrist::compute_full(&self.board);
        self.packed = PackedPosition::from_board(&self.board);

        self.base = self.packed;
        self.base_flags = self.state_flags();
        self.base_fifty = fifty;
        self.base_fullmove = fullmove.max(1);
        self.history
            .reset(self.packed, self.base_flags, self.zobrist_key, fifty);
        self.stack.clear();
    }

    /// Check that `board` can be played from with `side_to_move` to move:
    /// one king per color and the side that just moved not left in check.
    pub(crate) fn validate_board(board: &[Piece; 64], side_to_move: Color) -> ChessResult<()> {
        let white_king = Piece::new(Color::White, PieceKind::King);
        let black_king = Piece::new(Color::Black, PieceKind::King);
        let white = board.iter().filter(|&&p| p == white_king).count() as u8;
        let black = board.iter().filter(|&&p| p == black_king).count() as u8;
        if white != 1 || black != 1 {
            return Err(ChessErrors::WrongKingCount(white, black));
        }

        let waiting = side_to_move.opposite();
        let waiting_king = Piece::new(waiting, PieceKind::King);
        let king_sq = board
            .iter()
            .position(|&p| p == waiting_king)
            .ok_or(ChessErrors::WrongKingCount(white, black))? as Square;
        if crate::move_generation::legal_move_checks::attackers_of(board, side_to_move, king_sq, None) > 0 {
            return Err(ChessErrors::OpponentInCheck);
        }
        Ok(())
    }

    /// Castle counters consistent with what stands on the origin squares:
    /// a piece found on its origin counts as unmoved.
    pub(crate) fn counters_from_occupancy(board: &[Piece; 64]) -> [u16; 6] {
        let expected = [
            Piece::new(Color::White, PieceKind::King),
            Piece::new(Color::White, PieceKind::Rook),
            Piece::new(Color::White, PieceKind::Rook),
            Piece::new(Color::Black, PieceKind::King),
            Piece::new(Color::Black, PieceKind::Rook),
            Piece::new(Color::Black, PieceKind::Rook),
        ];
        std::array::from_fn(|i| u16::from(board[CASTLE_ORIGINS[i] as usize] != expected[i]))
    }

    /// Castle counters that grant exactly the rights in `rights[color][side]`.
    pub(crate) fn counters_from_rights(rights: [[bool; 2]; 2]) -> [u16; 6] {
        let mut counters = [1u16; 6];
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if rights[color.index()][side.index()] {
                    let geometry = castle_geometry(color, side);
                    counters[geometry.king_counter] = 0;
                    counters[geometry.rook_counter] = 0;
                }
            }
        }
        counters
    }

    #[inline]
    pub fn board(&self) -> &[Piece; 64] {
        &self.board
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Piece {
        self.board[square as usize]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_square[color.index()]
    }

    #[inline]
    pub fn piece_counts(&self) -> &[u8; 16] {
        &self.piece_counts
    }

    #[inline]
    pub fn count_of(&self, piece: Piece) -> u8 {
        self.piece_counts[piece.index()]
    }

    #[inline]
    pub fn castle_counters(&self) -> &[u16; 6] {
        &self.castle_counters
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    #[inline]
    pub fn packed(&self) -> PackedPosition {
        self.packed
    }

    #[inline]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    #[inline]
    pub fn stack(&self) -> &MoveStack {
        &self.stack
    }

    #[inline]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[inline]
    pub fn is_design_mode(&self) -> bool {
        self.design_mode
    }

    /// Packed board and flags the move stack replays from.
    #[inline]
    pub fn base(&self) -> (PackedPosition, StateFlags) {
        (self.base, self.base_flags)
    }

    /// Reversible-ply count the current game started with.
    #[inline]
    pub fn base_fifty(&self) -> u16 {
        self.base_fifty
    }

    #[inline]
    pub fn base_fullmove(&self) -> u16 {
        self.base_fullmove
    }

    /// Plies since the last pawn move or capture.
    #[inline]
    pub fn fifty_counter(&self) -> u16 {
        self.history.fifty_counter()
    }

    /// Full-move number in the FEN sense, counted from the base position.
    pub fn fullmove_number(&self) -> u16 {
        let black_started = self.base_flags.side_to_move() == Color::Black;
        let plies = self.stack.cursor() + usize::from(black_started);
        self.base_fullmove.saturating_add((plies / 2) as u16)
    }

    /// Neither the king nor the rook ever left (or was taken on) its origin,
    /// and both still stand there.
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        let geometry = castle_geometry(color, side);
        self.castle_counters[geometry.king_counter] == 0
            && self.castle_counters[geometry.rook_counter] == 0
            && self.board[geometry.king_from as usize].is(color, PieceKind::King)
            && self.board[geometry.rook_from as usize].is(color, PieceKind::Rook)
    }

    /// En-passant pawn if the side to move has a pawn beside it to take it with.
    pub fn en_passant_capturable(&self) -> Option<Square> {
        let target = self.en_passant?;
        let mover = self.side_to_move;
        if !self.board[target as usize].is(mover.opposite(), PieceKind::Pawn) {
            return None;
        }
        let col = column(target);
        let has_neighbour = [col.checked_sub(1), (col < 7).then_some(col + 1)]
            .into_iter()
            .flatten()
            .any(|c| self.board[square_at(c, rank(target)) as usize].is(mover, PieceKind::Pawn));
        has_neighbour.then_some(target)
    }

    /// Flags for the current position. The en-passant column is recorded only
    /// when a capture is available, so positions differing only by a dead
    /// double step compare equal.
    pub fn state_flags(&self) -> StateFlags {
        let castling = [Color::White, Color::Black].map(|color| {
            [CastleSide::King, CastleSide::Queen].map(|side| self.can_castle(color, side))
        });
        StateFlags::new(
            self.side_to_move,
            castling,
            self.en_passant_capturable().map(column),
        )
    }

    /// Board write that keeps counts, king cache and packed mirror in step.
    /// The Zobrist key is left to the caller so several writes can be folded
    /// into one batched update.
    #[inline]
    pub(crate) fn write_square(&mut self, square: Square, piece: Piece) {
        let old = self.board[square as usize];
        self.piece_counts[old.index()] -= 1;
        self.piece_counts[piece.index()] += 1;
        self.board[square as usize] = piece;
        self.packed.set(square, piece);
        if piece.kind() == Some(PieceKind::King) {
            if let Some(color) = piece.color() {
                self.king_square[color.index()] = square;
            }
        }
    }

    /// `write_square` plus the matching Zobrist update.
    #[inline]
    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        let old = self.board[square as usize];
        self.zobrist_key = zobrist::update(self.zobrist_key, square, old, piece);
        self.write_square(square, piece);
    }

    /// Cross-check every cached value against the board. Panics on mismatch.
    pub fn check_integrity(&self) {
        let mut counts = [0u8; 16];
        for piece in self.board {
            counts[piece.index()] += 1;
        }
        if counts != self.piece_counts {
            tracing::error!(?counts, cached = ?self.piece_counts, "piece count mismatch");
            panic!("integrity check failed: piece counts out of step with the board");
        }

        if !self.design_mode {
            for color in Color::BOTH {
                let sq = self.king_square[color.index()];
                if !self.board[sq as usize].is(color, PieceKind::King) {
                    tracing::error!(?color, square = sq, "cached king square is stale");
                    panic!("integrity check failed: king square cache for {color:?} is stale");
                }
            }
        }

        let full = zobrist::compute_full(&self.board);
        if full != self.zobrist_key {
            tracing::error!(full, incremental = self.zobrist_key, "zobrist key mismatch");
            panic!("integrity check failed: incremental zobrist key diverged");
        }

        if PackedPosition::from_board(&self.board) != self.packed {
            tracing::error!(packed = ?self.packed.words, "packed mirror mismatch");
            panic!("integrity check failed: packed mirror out of step with the board");
        }

        if self.en_passant_stack.len() != self.stack.cursor() {
            tracing::error!(
                en_passant = self.en_passant_stack.len(),
                stack = self.stack.cursor(),
                "en-passant stack depth mismatch"
            );
            panic!("integrity check failed: en-passant stack depth differs from the move stack");
        }
    }
}
