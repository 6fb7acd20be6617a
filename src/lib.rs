//! Crate root module declarations for the Plum board engine.
//!
//! A mailbox chess rules-and-position engine: legal move generation, check and
//! draw detection, incremental Zobrist hashing, undo/redo, and a saved-game
//! format. Search and protocol front ends are expected to live elsewhere and
//! plug in through `search::evaluation::Evaluator`.

pub mod chess_errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod config;
    pub mod design;
    pub mod position;
}

pub mod moves {
    pub mod chess_move;
    pub mod move_record;
    pub mod move_tables;
}

pub mod move_generation {
    pub mod game_result;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod perft;
    pub mod trial_move;
}

pub mod search {
    pub mod evaluation;
    pub mod zobrist;
}

pub mod history {
    pub mod move_history;
    pub mod move_stack;
    pub mod packed_position;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod random_playout;
    pub mod render_game_state;
    pub mod saved_game;
}
