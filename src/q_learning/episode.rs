//! Self-play episodes with per-transition Q-learning updates

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{
        policy::EpsilonGreedy,
        q_table::{LearningParams, NextState, ValueTable},
    },
    tictactoe::{Board, Player},
    types::{Action, StateKey},
};

/// Reward for the move that completes a line
pub const WIN_REWARD: f64 = 1.0;
/// Reward for the move that fills the last cell without a winner
pub const DRAW_REWARD: f64 = 0.5;

/// Where a game stands after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Win(Player),
    Draw,
}

impl GameStatus {
    /// Status after `mover` has just played on `board`.
    ///
    /// Only the mover can have completed a line, so the win check is for
    /// the mover alone; the draw check follows it.
    pub fn after_move(board: &Board, mover: Player) -> Self {
        if board.is_win(mover) {
            GameStatus::Win(mover)
        } else if board.is_draw() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }

    /// Reward credited to the move that produced this status
    pub fn reward(self) -> f64 {
        match self {
            GameStatus::Win(_) => WIN_REWARD,
            GameStatus::Draw => DRAW_REWARD,
            GameStatus::InProgress => 0.0,
        }
    }
}

/// One applied move and the update it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub player: Player,
    pub state: StateKey,
    pub action: Action,
    pub reward: f64,
    pub next: NextState,
    /// Q(state, action) after the update
    pub value: f64,
}

/// Record of a finished self-play game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub transitions: Vec<Transition>,
    pub final_board: Board,
    pub status: GameStatus,
    /// Player who made the final move. On a draw this is whoever filled the
    /// last cell.
    pub last_mover: Player,
}

impl Episode {
    pub fn winner(&self) -> Option<Player> {
        match self.status {
            GameStatus::Win(player) => Some(player),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Moves in play order
    pub fn actions(&self) -> Vec<Action> {
        self.transitions.iter().map(|t| t.action).collect()
    }
}

/// Play one self-play game from the empty board, X first, choosing moves
/// with `policy` and updating `table` after every move.
///
/// # Errors
///
/// Propagates policy errors. An action rejected by the board surfaces as
/// [`Error::IllegalGeneratedMove`]; the policy only draws from legal moves, so
/// this indicates a bug rather than a condition to retry.
pub fn run_episode(
    table: &mut ValueTable,
    policy: &mut EpsilonGreedy,
    epsilon: f64,
    params: LearningParams,
) -> Result<Episode> {
    play_episode(table, params, |table, board| {
        policy.choose_action(table, board, epsilon)
    })
}

/// Drive one game with an arbitrary move chooser.
///
/// Each step snapshots the state key, asks `choose` for a move, applies it
/// for the current player, and feeds the transition into
/// [`ValueTable::update`]:
///
/// - a win credits [`WIN_REWARD`] with a terminal successor
/// - a draw credits [`DRAW_REWARD`] with a terminal successor
/// - otherwise the reward is 0, the successor is the new board, and the turn
///   passes to the other player
pub fn play_episode<F>(
    table: &mut ValueTable,
    params: LearningParams,
    mut choose: F,
) -> Result<Episode>
where
    F: FnMut(&ValueTable, &Board) -> Result<Action>,
{
    let mut board = Board::new();
    let mut player = Player::X;
    let mut transitions = Vec::with_capacity(9);

    loop {
        let state = board.key();
        let action = choose(&*table, &board)?;

        let next_board = board
            .apply(action, player)
            .map_err(|_| Error::IllegalGeneratedMove {
                row: action.row(),
                col: action.col(),
                state: state.to_string(),
            })?;

        let status = GameStatus::after_move(&next_board, player);
        let next = if status.is_over() {
            NextState::Terminal
        } else {
            NextState::State(next_board.key())
        };
        let reward = status.reward();
        let value = table.update(&state, action, reward, &next, params);

        transitions.push(Transition {
            player,
            state,
            action,
            reward,
            next,
            value,
        });
        board = next_board;

        if status.is_over() {
            return Ok(Episode {
                transitions,
                final_board: board,
                status,
                last_mover: player,
            });
        }

        player = player.opponent();
    }
}
