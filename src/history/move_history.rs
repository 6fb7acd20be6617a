//! Draw bookkeeping: fifty-move rule and threefold repetition.
//!
//! Every ply stores its packed position, state flags, repetition bucket and
//! fifty-move counter. Repetition detection is two-tier: a 16K table of
//! occurrence counters keyed by `(zobrist ^ flags) % 16384` gives a cheap hint,
//! and only when a bucket exceeds two occurrences is the exact packed history
//! scanned. Collisions can raise the hint but never produce a false draw.

use crate::game_state::chess_rules::{FIFTY_MOVE_PLIES, REPETITION_BUCKETS};
use crate::history::packed_position::{PackedPosition, StateFlags};

/// Draw condition detected when a ply was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatResult {
    #[default]
    None,
    ThreeFoldRepeat,
    FiftyRuleRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HistoryEntry {
    packed: PackedPosition,
    flags: StateFlags,
    bucket: u16,
    /// Plies since the last pawn move or capture.
    fifty: u16,
    result: RepeatResult,
}

#[derive(Debug, Clone)]
pub struct MoveHistory {
    entries: Vec<HistoryEntry>,
    buckets: Vec<u16>,
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(256),
            buckets: vec![0; REPETITION_BUCKETS],
        }
    }

    #[inline]
    fn bucket_of(key: u64, flags: StateFlags) -> u16 {
        ((key ^ u64::from(flags.bits())) % REPETITION_BUCKETS as u64) as u16
    }

    /// Forget everything and record `packed` as the first position of a game.
    /// `fifty` seeds the reversible-ply count, e.g. from a FEN halfmove clock.
    pub fn reset(&mut self, packed: PackedPosition, flags: StateFlags, key: u64, fifty: u16) {
        self.entries.clear();
        self.buckets.fill(0);
        let bucket = Self::bucket_of(key, flags);
        self.buckets[bucket as usize] = 1;
        self.entries.push(HistoryEntry {
            packed,
            flags,
            bucket,
            fifty,
            result: if fifty >= FIFTY_MOVE_PLIES {
                RepeatResult::FiftyRuleRepeat
            } else {
                RepeatResult::None
            },
        });
    }

    /// Record the position reached by a ply. `irreversible` is true for pawn
    /// moves and captures, which restart the fifty-move count.
    pub fn add(
        &mut self,
        packed: PackedPosition,
        flags: StateFlags,
        key: u64,
        irreversible: bool,
    ) -> RepeatResult {
        let fifty = if irreversible {
            0
        } else {
            self.entries.last().map_or(0, |e| e.fifty) + 1
        };

        let bucket = Self::bucket_of(key, flags);
        self.buckets[bucket as usize] += 1;

        let result = if fifty >= FIFTY_MOVE_PLIES {
            RepeatResult::FiftyRuleRepeat
        } else if self.buckets[bucket as usize] > 2 && self.count_earlier(&packed, flags, fifty) >= 2 {
            RepeatResult::ThreeFoldRepeat
        } else {
            RepeatResult::None
        };

        self.entries.push(HistoryEntry {
            packed,
            flags,
            bucket,
            fifty,
            result,
        });
        result
    }

    /// Exact scan over earlier same-side positions inside the reversible window.
    fn count_earlier(&self, packed: &PackedPosition, flags: StateFlags, fifty: u16) -> usize {
        // The new entry is not pushed yet; the previous same-side entry is two plies back.
        let len = self.entries.len();
        let window = (fifty as usize).min(len);
        (2..=window)
            .step_by(2)
            .map(|back| &self.entries[len - back])
            .filter(|e| e.flags == flags && e.packed == *packed)
            .count()
    }

    /// Undo the most recent `add`.
    ///
    /// Panics when only the starting entry is left; popping it would be a
    /// caller bug.
    pub fn remove_last(&mut self) {
        assert!(self.entries.len() > 1, "cannot remove the starting position from history");
        if let Some(entry) = self.entries.pop() {
            self.buckets[entry.bucket as usize] -= 1;
        }
    }

    /// Number of recorded positions, the starting one included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plies since the last pawn move or capture.
    #[inline]
    pub fn fifty_counter(&self) -> u16 {
        self.entries.last().map_or(0, |e| e.fifty)
    }

    /// Draw condition recorded for the latest position.
    #[inline]
    pub fn last_result(&self) -> RepeatResult {
        self.entries.last().map_or(RepeatResult::None, |e| e.result)
    }

    /// Occurrence hint for a position, as stored in its bucket.
    pub fn bucket_count(&self, key: u64, flags: StateFlags) -> u16 {
        self.buckets[Self::bucket_of(key, flags) as usize]
    }
}
