//! Epsilon-greedy action selection

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    q_learning::q_table::ValueTable,
    tictactoe::Board,
    types::Action,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Check that an exploration rate is a probability.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if `epsilon` is outside [0, 1].
pub fn validate_epsilon(epsilon: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(epsilon)
    } else {
        Err(Error::config(format!(
            "epsilon must be in [0, 1], got {epsilon}"
        )))
    }
}

/// ε-greedy policy over a [`ValueTable`]
///
/// Owns only its random number generator; the table is borrowed per call so
/// the same policy can serve training and play.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl EpsilonGreedy {
    pub fn new() -> Self {
        Self {
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Choose a legal action for `board`.
    ///
    /// With probability `epsilon` the action is uniform over the legal
    /// moves. Otherwise the best recorded action wins (ties to the lowest
    /// row, then column), falling back to a uniform choice when the state
    /// has no usable values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] for terminal boards and
    /// [`Error::InvalidConfiguration`] if `epsilon` is outside [0, 1].
    pub fn choose_action(
        &mut self,
        table: &ValueTable,
        board: &Board,
        epsilon: f64,
    ) -> Result<Action> {
        validate_epsilon(epsilon)?;

        let legal = board.legal_actions();
        if legal.is_empty() {
            return Err(Error::NoLegalActions {
                state: board.key().to_string(),
            });
        }

        if self.rng.random::<f64>() < epsilon {
            return self.random_action(&legal);
        }

        match table.best_action(&board.key(), &legal) {
            Some(action) => Ok(action),
            None => self.random_action(&legal),
        }
    }

    fn random_action(&mut self, legal: &[Action]) -> Result<Action> {
        legal
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| Error::NoLegalActions {
                state: String::from("<empty action set>"),
            })
    }
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::q_table::{LearningParams, NextState};

    fn action(row: usize, col: usize) -> Action {
        Action::new(row, col).unwrap()
    }

    #[test]
    fn test_choice_is_always_legal() {
        let table = ValueTable::new();
        let mut policy = EpsilonGreedy::new().with_seed(3);
        let board = Board::from_string("XO.XO.O.X").unwrap();
        let legal = board.legal_actions();

        for epsilon in [0.0, 0.5, 1.0] {
            for _ in 0..50 {
                let chosen = policy.choose_action(&table, &board, epsilon).unwrap();
                assert!(legal.contains(&chosen), "{chosen} not in {legal:?}");
            }
        }
    }

    #[test]
    fn test_greedy_picks_max_value() {
        let mut table = ValueTable::new();
        let params = LearningParams::new(1.0, 0.0).unwrap();
        let board = Board::new();
        let state = board.key();
        table.update(&state, action(0, 0), 0.2, &NextState::Terminal, params);
        table.update(&state, action(2, 1), 0.9, &NextState::Terminal, params);

        let mut policy = EpsilonGreedy::new().with_seed(1);
        for _ in 0..10 {
            assert_eq!(
                policy.choose_action(&table, &board, 0.0).unwrap(),
                action(2, 1)
            );
        }
    }

    #[test]
    fn test_greedy_ignores_stale_illegal_entry() {
        let mut table = ValueTable::new();
        let params = LearningParams::new(1.0, 0.0).unwrap();
        let board = Board::from_string("X........").unwrap();
        // Corrupted entry pointing at an occupied cell.
        table.update(&board.key(), action(0, 0), 1.0, &NextState::Terminal, params);

        let mut policy = EpsilonGreedy::new().with_seed(9);
        for _ in 0..20 {
            let chosen = policy.choose_action(&table, &board, 0.0).unwrap();
            assert_ne!(chosen, action(0, 0));
        }
    }

    #[test]
    fn test_terminal_board_has_no_action() {
        let board = Board::from_string("XXXOO....").unwrap();
        let err = EpsilonGreedy::new()
            .choose_action(&ValueTable::new(), &board, 0.0)
            .unwrap_err();
        assert!(matches!(err, Error::NoLegalActions { .. }));
    }

    #[test]
    fn test_epsilon_out_of_range_rejected() {
        let mut policy = EpsilonGreedy::new();
        let table = ValueTable::new();
        assert!(policy.choose_action(&table, &Board::new(), 1.5).is_err());
        assert!(policy.choose_action(&table, &Board::new(), -0.1).is_err());
    }

    #[test]
    fn test_seeded_policies_agree() {
        let table = ValueTable::new();
        let board = Board::new();
        let mut a = EpsilonGreedy::new().with_seed(42);
        let mut b = EpsilonGreedy::new().with_seed(42);
        for _ in 0..20 {
            assert_eq!(
                a.choose_action(&table, &board, 1.0).unwrap(),
                b.choose_action(&table, &board, 1.0).unwrap()
            );
        }
    }
}
