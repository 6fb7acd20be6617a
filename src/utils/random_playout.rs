//! Seeded random-game soak driver.
//!
//! Plays uniformly random legal moves from a start position, classifying every
//! ply, occasionally stepping back and forth through the stack, and finally
//! unwinding the whole game. Any drift between the incremental state and a
//! recomputation panics, so a clean run is evidence that apply, undo and redo
//! are exact inverses.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::game_state::chess_types::*;
use crate::move_generation::game_result::GameResult;
use crate::search::zobrist;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayoutConfig {
    pub games: u32,
    /// Games still running after this many plies are abandoned.
    pub max_plies: u16,
    /// Chance per ply of an undo immediately followed by a redo.
    pub undo_redo_chance: f64,
    pub seed: u64,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            games: 16,
            max_plies: 300,
            undo_redo_chance: 0.1,
            seed: 0x5EED,
        }
    }
}

/// How the games ended, plus totals over all plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayoutStats {
    pub games: u32,
    pub plies: u64,
    pub checks: u64,
    pub undo_redos: u64,
    pub mates: u32,
    pub stalemates: u32,
    pub threefold: u32,
    pub fifty_move: u32,
    pub insufficient_material: u32,
    pub abandoned: u32,
}

impl PlayoutStats {
    fn record_end(&mut self, result: GameResult) {
        match result {
            GameResult::Mate => self.mates += 1,
            GameResult::TieNoMove => self.stalemates += 1,
            GameResult::ThreeFoldRepeat => self.threefold += 1,
            GameResult::FiftyRuleRepeat => self.fifty_move += 1,
            GameResult::TieNoMatePossible => self.insufficient_material += 1,
            GameResult::OnGoing | GameResult::Check => self.abandoned += 1,
        }
    }
}

pub fn random_playout(start: &Position, config: &PlayoutConfig) -> PlayoutStats {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut stats = PlayoutStats::default();

    for game in 0..config.games {
        let mut position = start.clone();
        let result = play_one_game(&mut position, config, &mut rng, &mut stats);
        stats.record_end(result);
        stats.games += 1;
        tracing::debug!(game, ?result, plies = position.stack().cursor(), "random game finished");

        while position.undo_last().is_some() {}
        assert_eq!(
            position.zobrist_key(),
            start.zobrist_key(),
            "unwinding game {game} did not restore the start key"
        );
        assert_eq!(position.board(), start.board());
        assert_eq!(position.state_flags(), start.state_flags());
    }
    stats
}

fn play_one_game(
    position: &mut Position,
    config: &PlayoutConfig,
    rng: &mut StdRng,
    stats: &mut PlayoutStats,
) -> GameResult {
    let mut result = position.classify_result();
    for _ in 0..config.max_plies {
        if result.is_terminal() {
            return result;
        }
        let moves = position.legal_moves();
        let mv = moves[rng.random_range(0..moves.len())];
        let repeat = position.apply_move(&mv);
        stats.plies += 1;

        assert_eq!(
            position.zobrist_key(),
            zobrist::compute_full(position.board()),
            "incremental key drifted after {mv}"
        );

        if rng.random_bool(config.undo_redo_chance) {
            let key = position.zobrist_key();
            position.undo_last();
            let again = position.redo();
            assert_eq!(again, Some(repeat));
            assert_eq!(position.zobrist_key(), key);
            stats.undo_redos += 1;
        }

        result = position.classify(repeat);
        if result == GameResult::Check {
            stats.checks += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::config::RulesConfig;
    use crate::utils::fen_parser::parse_fen_with_config;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    fn checked() -> RulesConfig {
        RulesConfig {
            verify_integrity: true,
            ..RulesConfig::default()
        }
    }

    #[test]
    fn soak_from_the_start_position() {
        let config = PlayoutConfig {
            games: 8,
            ..PlayoutConfig::default()
        };
        let stats = random_playout(&Position::with_config(checked()), &config);
        assert_eq!(stats.games, 8);
        let ended = stats.mates
            + stats.stalemates
            + stats.threefold
            + stats.fifty_move
            + stats.insufficient_material
            + stats.abandoned;
        assert_eq!(ended, 8);
        assert!(stats.plies > 0);
    }

    #[test]
    fn same_seed_same_games() {
        let config = PlayoutConfig {
            games: 4,
            max_plies: 80,
            ..PlayoutConfig::default()
        };
        let start = Position::new();
        assert_eq!(random_playout(&start, &config), random_playout(&start, &config));
    }

    #[test]
    fn no_generated_move_leaves_the_mover_in_check() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut position = parse_fen_with_config(KIWIPETE, checked()).expect("fixture fen");
        for _ in 0..120 {
            let mover = position.side_to_move();
            let moves = position.legal_moves();
            if moves.is_empty() {
                break;
            }
            for mv in &moves {
                position.apply_move(mv);
                assert!(!position.is_in_check(mover), "{mv} leaves the king attacked");
                position.undo_move(mv);
            }
            position.apply_move(&moves[rng.random_range(0..moves.len())]);
        }
    }

    #[test]
    fn apply_then_undo_restores_every_field() {
        let mut rng = StdRng::seed_from_u64(29);
        let mut position = parse_fen_with_config(KIWIPETE, checked()).expect("fixture fen");
        for _ in 0..60 {
            let moves = position.legal_moves();
            if moves.is_empty() {
                break;
            }
            let before = (
                *position.board(),
                *position.piece_counts(),
                *position.castle_counters(),
                position.en_passant(),
                position.zobrist_key(),
                position.packed(),
                position.history().len(),
            );
            let mv = moves[rng.random_range(0..moves.len())];
            position.apply_move(&mv);
            position.undo_move(&mv);
            let after = (
                *position.board(),
                *position.piece_counts(),
                *position.castle_counters(),
                position.en_passant(),
                position.zobrist_key(),
                position.packed(),
                position.history().len(),
            );
            assert_eq!(before, after, "{mv} was not undone exactly");
            position.apply_move(&mv);
        }
    }

    #[test]
    fn fresh_hash_matches_incremental_hash_along_a_game() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut position = Position::with_config(checked());
        for _ in 0..200 {
            let moves = position.legal_moves();
            if moves.is_empty() {
                break;
            }
            position.apply_move(&moves[rng.random_range(0..moves.len())]);
            assert_eq!(position.zobrist_key(), zobrist::compute_full(position.board()));
            let rebuilt = parse_fen_with_config(
                &crate::utils::fen_generator::generate_fen(&position),
                checked(),
            )
            .expect("generated FEN should parse");
            assert_eq!(rebuilt.zobrist_key(), position.zobrist_key());
            assert_eq!(rebuilt.state_flags(), position.state_flags());
        }
    }
}
