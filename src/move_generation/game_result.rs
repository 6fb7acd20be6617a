//! Game state classification after a ply.

use crate::game_state::chess_types::*;
use crate::history::move_history::RepeatResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    OnGoing,
    /// Side to move is in check but has replies.
    Check,
    Mate,
    ThreeFoldRepeat,
    FiftyRuleRepeat,
    /// Stalemate.
    TieNoMove,
    /// Neither side has material left to mate with.
    TieNoMatePossible,
}

impl GameResult {
    /// True when the game cannot continue.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameResult::OnGoing | GameResult::Check)
    }

    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameResult::ThreeFoldRepeat
                | GameResult::FiftyRuleRepeat
                | GameResult::TieNoMove
                | GameResult::TieNoMatePossible
        )
    }
}

impl Position {
    /// Classify the position for the side to move. A draw already detected
    /// by the history takes precedence over everything else.
    pub fn classify(&mut self, repeat: RepeatResult) -> GameResult {
        match repeat {
            RepeatResult::ThreeFoldRepeat => return GameResult::ThreeFoldRepeat,
            RepeatResult::FiftyRuleRepeat => return GameResult::FiftyRuleRepeat,
            RepeatResult::None => {}
        }

        let info = self.attack_info(self.side_to_move);
        match (info.in_check, info.move_count) {
            (true, 0) => GameResult::Mate,
            (true, _) => GameResult::Check,
            (false, 0) => GameResult::TieNoMove,
            _ if !self.is_sufficient_material() => GameResult::TieNoMatePossible,
            _ => GameResult::OnGoing,
        }
    }

    /// `classify` using the draw state recorded for the latest position.
    pub fn classify_result(&mut self) -> GameResult {
        self.classify(self.history.last_result())
    }

    /// True if a pawn, rook or queen is left, or either side keeps two minor
    /// pieces.
    pub fn is_sufficient_material(&self) -> bool {
        let count = |color, kind| self.piece_counts[Piece::new(color, kind).index()];
        Color::BOTH.into_iter().any(|color| {
            count(color, PieceKind::Pawn) > 0
                || count(color, PieceKind::Rook) > 0
                || count(color, PieceKind::Queen) > 0
                || count(color, PieceKind::Knight) + count(color, PieceKind::Bishop) >= 2
        })
    }
}
