//! Common test utilities for the qtoe test suite.
//!
//! Board and action shorthands plus helpers for seeded training runs and
//! reachable positions.

#![allow(dead_code)]

use qtoe::{
    Action, Board, Player, ValueTable,
    pipeline::{TrainingConfig, TrainingPipeline, TrainingSummary},
    tictactoe::Cell,
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

pub fn action(row: usize, col: usize) -> Action {
    Action::new(row, col).unwrap()
}

/// Parse a board from rows such as `["XXX", "OO.", "..."]`.
pub fn board(rows: [&str; 3]) -> Board {
    Board::from_string(&rows.concat()).unwrap()
}

/// Seeded training run with default hyper-parameters.
pub fn train(episodes: usize, epsilon: f64, seed: u64) -> (ValueTable, TrainingSummary) {
    let config = TrainingConfig {
        episodes,
        epsilon,
        seed: Some(seed),
        ..TrainingConfig::default()
    };
    let mut table = ValueTable::new();
    let summary = TrainingPipeline::new(config)
        .unwrap()
        .run(&mut table)
        .unwrap();
    (table, summary)
}

/// Random non-terminal position reached by legal alternating play from the
/// empty board.
pub fn random_open_position(rng: &mut StdRng) -> Board {
    loop {
        let mut board = Board::new();
        let mut player = Player::X;
        let plies = rng.random_range(0..9);
        for _ in 0..plies {
            let legal = board.legal_actions();
            let Some(&choice) = legal.choose(rng) else {
                break;
            };
            board = board.apply(choice, player).unwrap();
            player = player.opponent();
        }
        if !board.is_terminal() {
            return board;
        }
    }
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn count_cells(board: &Board, cell: Cell) -> usize {
    Action::all().filter(|&a| board.cell(a) == cell).count()
}
