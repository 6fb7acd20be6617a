//! Move-path enumeration used to validate move generation.
//!
//! `perft` counts leaf nodes of the legal move tree to a fixed depth; the
//! totals for well-known positions are published and make a precise
//! regression check. `perft_parallel` splits the root moves over worker
//! threads, each owning its own clone of the position.

use std::thread;

use crate::game_state::chess_types::*;
use crate::moves::chess_move::{Move, MoveKind};

/// Leaf statistics collected by `perft_counts`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Number of legal move paths of length `depth`.
pub fn perft(position: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in &moves {
        position.apply_move(mv);
        nodes += perft(position, depth - 1);
        position.undo_move(mv);
    }
    nodes
}

/// Per-root-move node counts, sorted by move text.
pub fn perft_divide(position: &mut Position, depth: u8) -> Vec<(Move, u64)> {
    let mut out = Vec::new();
    if depth == 0 {
        return out;
    }
    for mv in position.legal_moves() {
        position.apply_move(&mv);
        out.push((mv, perft(position, depth - 1)));
        position.undo_move(&mv);
    }
    out.sort_by_cached_key(|(mv, _)| mv.to_string());
    out
}

/// `perft` plus a breakdown of the leaf moves.
pub fn perft_counts(position: &mut Position, depth: u8) -> PerftCounts {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return counts;
    }
    for mv in position.legal_moves() {
        position.apply_move(&mv);
        if depth == 1 {
            tally_leaf(position, &mv, &mut counts);
        } else {
            counts.merge(perft_counts(position, depth - 1));
        }
        position.undo_move(&mv);
    }
    counts
}

fn tally_leaf(position: &mut Position, mv: &Move, counts: &mut PerftCounts) {
    counts.nodes += 1;
    if mv.is_capture() {
        counts.captures += 1;
    }
    match mv.kind {
        MoveKind::EnPassant => counts.en_passant += 1,
        MoveKind::Castle(_) => counts.castles += 1,
        MoveKind::Promotion(_) => counts.promotions += 1,
        _ => {}
    }
    let replying = position.side_to_move();
    if position.is_in_check(replying) {
        counts.checks += 1;
        if position.attack_info(replying).move_count == 0 {
            counts.checkmates += 1;
        }
    }
}

/// `perft` with the root moves spread over the available cores.
pub fn perft_parallel(position: &Position, depth: u8) -> u64 {
    if depth <= 1 {
        return perft(&mut position.clone(), depth);
    }
    let root_moves = position.clone().legal_moves();
    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(root_moves.len().max(1));
    let chunk = root_moves.len().div_ceil(workers).max(1);

    thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .chunks(chunk)
            .map(|moves| {
                let mut local = position.clone();
                scope.spawn(move || {
                    let mut nodes = 0;
                    for mv in moves {
                        local.apply_move(mv);
                        nodes += perft(&mut local, depth - 1);
                        local.undo_move(mv);
                    }
                    nodes
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(nodes) => nodes,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::config::RulesConfig;
    use crate::utils::fen_parser::parse_fen_with_config;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";

    fn standard(fen: &str) -> Position {
        parse_fen_with_config(fen, RulesConfig::standard()).expect("perft fen should parse")
    }

    #[test]
    fn start_position_counts() {
        let mut position = Position::with_config(RulesConfig::standard());
        assert_eq!(perft(&mut position, 1), 20);
        assert_eq!(perft(&mut position, 2), 400);
        assert_eq!(perft(&mut position, 3), 8902);
        position.check_integrity();
        assert_eq!(position.history().len(), 1);
    }

    #[test]
    fn kiwipete_counts() {
        let mut position = standard(KIWIPETE);
        assert_eq!(perft(&mut position, 1), 48);
        assert_eq!(perft(&mut position, 2), 2039);
    }

    #[test]
    fn position_3_counts() {
        let mut position = standard(POSITION_3);
        assert_eq!(perft(&mut position, 1), 14);
        assert_eq!(perft(&mut position, 2), 191);
        assert_eq!(perft(&mut position, 3), 2812);
    }

    #[test]
    fn position_4_counts() {
        let mut position = standard(POSITION_4);
        assert_eq!(perft(&mut position, 1), 6);
        assert_eq!(perft(&mut position, 2), 264);
        assert_eq!(perft(&mut position, 3), 9467);
    }

    #[test]
    fn kiwipete_breakdown() {
        let mut position = standard(KIWIPETE);
        let counts = perft_counts(&mut position, 2);
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 2039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
                checks: 3,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn start_breakdown_at_depth_three() {
        let mut position = Position::with_config(RulesConfig::standard());
        let counts = perft_counts(&mut position, 3);
        assert_eq!(counts.nodes, 8902);
        assert_eq!(counts.captures, 34);
        assert_eq!(counts.checks, 12);
        assert_eq!(counts.checkmates, 0);
    }

    #[test]
    fn pawn_variant_adds_one_move_per_promotion() {
        let fen = "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N w - - 0 1";
        let mut with_pawn =
            parse_fen_with_config(fen, RulesConfig::default()).expect("perft fen should parse");
        let mut without = standard(fen);
        let promotions = without
            .legal_moves()
            .iter()
            .filter(|mv| mv.promotion() == Some(PieceKind::Queen))
            .count() as u64;
        assert!(promotions > 0);
        assert_eq!(perft(&mut with_pawn, 1), perft(&mut without, 1) + promotions);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut position = standard(POSITION_3);
        let divide = perft_divide(&mut position, 2);
        assert_eq!(divide.len(), 14);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 191);
    }

    #[test]
    fn parallel_matches_single_threaded() {
        let position = standard(KIWIPETE);
        assert_eq!(perft_parallel(&position, 2), 2039);
        assert_eq!(perft_parallel(&position, 1), 48);
    }
}
