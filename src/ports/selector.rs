//! Move selector port - anything that can pick a move in a live game

use crate::{
    Result,
    tictactoe::{Board, Player},
    types::Action,
};

/// Source of moves for one side of a game
///
/// The interactive shell asks a selector for the agent's moves, so a trained
/// table, a scripted opponent in tests, or any other strategy can sit across
/// from the human.
pub trait MoveSelector: Send {
    /// Select a move for `player` on `board`.
    ///
    /// # Errors
    ///
    /// Returns an error if no legal move exists (terminal board).
    fn select_move(&mut self, board: &Board, player: Player) -> Result<Action>;

    /// Display name
    fn name(&self) -> &str;
}
