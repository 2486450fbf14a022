//! Value table for tabular Q-learning

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Action, StateKey},
};

/// Learning rate α and discount factor γ for one-step Q-learning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningParams {
    alpha: f64,
    gamma: f64,
}

impl LearningParams {
    /// Create validated learning parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `alpha` is in (0, 1]
    /// and `gamma` is in [0, 1].
    pub fn new(alpha: f64, gamma: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::config(format!(
                "alpha must be in (0, 1], got {alpha}"
            )));
        }
        if !(0.0..=1.0).contains(&gamma) {
            return Err(Error::config(format!(
                "gamma must be in [0, 1], got {gamma}"
            )));
        }
        Ok(Self { alpha, gamma })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
        }
    }
}

/// Successor of a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextState {
    /// The move ended the game; no successor values are bootstrapped
    Terminal,
    State(StateKey),
}

/// Q-values keyed by board state, then by action.
///
/// State entries appear the first time a state takes part in an update and
/// are never removed. Missing states and missing actions read as 0 when
/// bootstrapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTable {
    entries: HashMap<StateKey, BTreeMap<Action, f64>>,
}

impl ValueTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded action values for a state, in row-major action order
    pub fn values(&self, state: &StateKey) -> Option<&BTreeMap<Action, f64>> {
        self.entries.get(state)
    }

    /// Recorded Q-value for a state-action pair
    pub fn get(&self, state: &StateKey, action: Action) -> Option<f64> {
        self.entries
            .get(state)
            .and_then(|values| values.get(&action))
            .copied()
    }

    pub fn contains_state(&self, state: &StateKey) -> bool {
        self.entries.contains_key(state)
    }

    /// Largest recorded value for a state, or 0 when nothing is recorded
    pub fn max_value(&self, state: &StateKey) -> f64 {
        self.entries
            .get(state)
            .and_then(|values| values.values().copied().reduce(f64::max))
            .unwrap_or(0.0)
    }

    /// Highest-valued recorded action among `legal`.
    ///
    /// Ties go to the lowest row, then the lowest column. Returns `None` when
    /// the state is unknown or none of its recorded actions is legal.
    pub fn best_action(&self, state: &StateKey, legal: &[Action]) -> Option<Action> {
        let values = self.entries.get(state)?;
        let mut best: Option<(Action, f64)> = None;
        // BTreeMap iterates in row-major order, so a strict comparison keeps
        // the earliest action among equals.
        for (&action, &value) in values {
            if !legal.contains(&action) {
                continue;
            }
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// One-step Q-learning update; returns the new value of `Q(state, action)`.
    ///
    /// Q(s,a) ← (1-α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
    ///
    /// Both `state` and a non-terminal `next` are materialised as (possibly
    /// empty) entries before the update.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: Action,
        reward: f64,
        next: &NextState,
        params: LearningParams,
    ) -> f64 {
        self.entries.entry(state.clone()).or_default();

        let max_next_q = match next {
            NextState::Terminal => 0.0,
            NextState::State(key) => {
                self.entries.entry(key.clone()).or_default();
                self.max_value(key)
            }
        };

        let values = self.entries.entry(state.clone()).or_default();
        let current_q = values.get(&action).copied().unwrap_or(0.0);
        let new_q = (1.0 - params.alpha) * current_q
            + params.alpha * (reward + params.gamma * max_next_q);
        values.insert(action, new_q);
        new_q
    }

    /// Number of states with an entry (including empty ones)
    pub fn state_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of recorded state-action values
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all states and their recorded action values
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &BTreeMap<Action, f64>)> {
        self.entries.iter()
    }
}
