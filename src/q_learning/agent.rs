//! Trained Q-learning player
//!
//! Wraps a learned [`ValueTable`] with an ε-greedy policy so it can be
//! dropped into a game loop as a [`MoveSelector`].

use crate::{
    Result,
    ports::MoveSelector,
    q_learning::{
        policy::{EpsilonGreedy, validate_epsilon},
        q_table::ValueTable,
    },
    tictactoe::{Board, Player},
    types::Action,
};

/// Q-learning agent that plays from a fixed table
///
/// Play never updates the table. Exploration defaults to zero so the agent
/// always exploits what it learned.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    table: ValueTable,
    policy: EpsilonGreedy,
    epsilon: f64,
}

impl QLearningAgent {
    pub fn new(table: ValueTable) -> Self {
        Self {
            table,
            policy: EpsilonGreedy::new(),
            epsilon: 0.0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.policy = self.policy.with_seed(seed);
        self
    }

    /// Set the exploration rate used during play.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `epsilon` is outside
    /// [0, 1].
    pub fn with_epsilon(mut self, epsilon: f64) -> Result<Self> {
        self.epsilon = validate_epsilon(epsilon)?;
        Ok(self)
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }
}

impl MoveSelector for QLearningAgent {
    fn select_move(&mut self, board: &Board, _player: Player) -> Result<Action> {
        self.policy.choose_action(&self.table, board, self.epsilon)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::q_table::{LearningParams, NextState};

    #[test]
    fn test_agent_exploits_table() {
        let mut table = ValueTable::new();
        let board = Board::from_string("XX.OO....").unwrap();
        let win = Action::new(0, 2).unwrap();
        table.update(
            &board.key(),
            win,
            1.0,
            &NextState::Terminal,
            LearningParams::default(),
        );

        let mut agent = QLearningAgent::new(table).with_seed(1);
        assert_eq!(agent.select_move(&board, Player::X).unwrap(), win);
    }

    #[test]
    fn test_agent_rejects_bad_epsilon() {
        assert!(QLearningAgent::new(ValueTable::new()).with_epsilon(2.0).is_err());
        assert!(QLearningAgent::new(ValueTable::new()).with_epsilon(0.2).is_ok());
    }
}
