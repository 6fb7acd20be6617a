//! Perft baseline runner.
//!
//! Usage:
//! `cargo run --release --bin perft_baseline`
//! `cargo run --release --bin perft_baseline -- --depth 5 --soak 32`
//!
//! Set `RUST_LOG=plum_board=debug` for per-game soak output.

use std::time::Instant;

use tracing_subscriber::EnvFilter;

use plum_board::game_state::config::RulesConfig;
use plum_board::move_generation::perft::{perft_counts, perft_parallel};
use plum_board::utils::fen_parser::parse_fen_with_config;
use plum_board::utils::random_playout::{random_playout, PlayoutConfig};

fn parse_arg_u32(flag: &str, default: u32) -> u32 {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(v) = args[i + 1].parse::<u32>() {
                return v;
            }
        }
    }
    default
}

fn run_case(name: &str, fen: &str, depth: u8) -> Result<(), String> {
    let position =
        parse_fen_with_config(fen, RulesConfig::standard()).map_err(|e| format!("{name}: {e}"))?;

    let started = Instant::now();
    let nodes = perft_parallel(&position, depth);
    let elapsed = started.elapsed();
    let nps = (nodes as f64 / elapsed.as_secs_f64().max(1e-9)) as u64;
    println!(
        "{name}: depth={depth} nodes={nodes} elapsed_ms={} nps={nps}",
        elapsed.as_millis()
    );

    let breakdown = perft_counts(&mut position.clone(), depth.min(3));
    println!("{name}: breakdown at depth {}: {breakdown:?}", depth.min(3));
    Ok(())
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let depth = parse_arg_u32("--depth", 4).clamp(1, 8) as u8;
    let soak_games = parse_arg_u32("--soak", 0);
    let suite = [
        (
            "startpos",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        ),
        (
            "kiwipete",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        ),
        ("rook_endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
        (
            "promotions",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
        ),
    ];
    println!("perft baseline run: depth={depth}");
    for (name, fen) in suite {
        run_case(name, fen, depth)?;
    }

    if soak_games > 0 {
        let config = PlayoutConfig {
            games: soak_games,
            ..PlayoutConfig::default()
        };
        let start = plum_board::game_state::chess_types::Position::with_config(RulesConfig {
            verify_integrity: true,
            ..RulesConfig::default()
        });
        let started = Instant::now();
        let stats = random_playout(&start, &config);
        println!(
            "soak: elapsed_ms={} {stats:?}",
            started.elapsed().as_millis()
        );
    }
    Ok(())
}
