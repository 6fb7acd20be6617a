//! A played move together with its search-time and annotation metadata.

use std::fmt;

use chrono::TimeDelta;

use crate::moves::chess_move::Move;

/// What the search spent to find a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputationStats {
    pub nodes: u64,
    pub depth: u8,
    pub score: i32,
    pub elapsed: TimeDelta,
}

impl ComputationStats {
    pub fn nodes_per_second(&self) -> u64 {
        let ms = self.elapsed.num_milliseconds();
        if ms <= 0 {
            return self.nodes;
        }
        self.nodes.saturating_mul(1000) / ms as u64
    }
}

/// Numeric annotation glyphs `$1`-`$6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nag {
    Good,
    Mistake,
    Brilliant,
    Blunder,
    Interesting,
    Dubious,
}

impl Nag {
    pub const fn code(self) -> u8 {
        match self {
            Nag::Good => 1,
            Nag::Mistake => 2,
            Nag::Brilliant => 3,
            Nag::Blunder => 4,
            Nag::Interesting => 5,
            Nag::Dubious => 6,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Nag::Good),
            2 => Some(Nag::Mistake),
            3 => Some(Nag::Brilliant),
            4 => Some(Nag::Blunder),
            5 => Some(Nag::Interesting),
            6 => Some(Nag::Dubious),
            _ => None,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Nag::Good => "!",
            Nag::Mistake => "?",
            Nag::Brilliant => "!!",
            Nag::Blunder => "??",
            Nag::Interesting => "!?",
            Nag::Dubious => "?!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    pub stats: Option<ComputationStats>,
    /// Move was taken from an opening book rather than searched.
    pub from_book: bool,
    pub nag: Option<Nag>,
}

impl MoveRecord {
    pub fn new(mv: Move) -> Self {
        MoveRecord {
            mv,
            stats: None,
            from_book: false,
            nag: None,
        }
    }

    pub fn from_book(mv: Move) -> Self {
        MoveRecord {
            from_book: true,
            ..Self::new(mv)
        }
    }

    pub fn with_stats(mut self, stats: ComputationStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_nag(mut self, nag: Nag) -> Self {
        self.nag = Some(nag);
        self
    }
}

impl From<Move> for MoveRecord {
    fn from(mv: Move) -> Self {
        MoveRecord::new(mv)
    }
}

impl fmt::Display for MoveRecord {
    /// Book moves are parenthesised; a NAG glyph follows the move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from_book {
            write!(f, "({})", self.mv)?;
        } else {
            write!(f, "{}", self.mv)?;
        }
        if let Some(nag) = self.nag {
            f.write_str(nag.symbol())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::*;
    use crate::moves::chess_move::MoveKind;

    fn e2e4() -> Move {
        Move::new(square_at(3, 1), square_at(3, 3), Piece::EMPTY, MoveKind::DoubleStep)
    }

    #[test]
    fn book_moves_are_parenthesised() {
        assert_eq!(MoveRecord::new(e2e4()).to_string(), "e2-e4");
        assert_eq!(MoveRecord::from_book(e2e4()).to_string(), "(e2-e4)");
        assert_eq!(
            MoveRecord::from_book(e2e4()).with_nag(Nag::Interesting).to_string(),
            "(e2-e4)!?"
        );
    }

    #[test]
    fn nag_codes_round_trip() {
        for code in 1..=6 {
            let nag = Nag::from_code(code).expect("codes 1-6 are defined");
            assert_eq!(nag.code(), code);
        }
        assert_eq!(Nag::from_code(0), None);
    }

    #[test]
    fn nodes_per_second_uses_elapsed_time() {
        let stats = ComputationStats {
            nodes: 5_000,
            depth: 4,
            score: 12,
            elapsed: TimeDelta::milliseconds(500),
        };
        assert_eq!(stats.nodes_per_second(), 10_000);
        let instant = ComputationStats {
            nodes: 7,
            ..ComputationStats::default()
        };
        assert_eq!(instant.nodes_per_second(), 7);
    }
}
