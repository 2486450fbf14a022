//! Tabular Q-learning for self-play tic-tac-toe
//!
//! ## Pieces
//!
//! - [`ValueTable`]: state key → action → Q-value, grown lazily
//! - [`EpsilonGreedy`]: explores with probability ε, otherwise exploits the
//!   best recorded action (ties to the lowest row, then column)
//! - [`run_episode`]: one self-play game, updating after every move with
//!
//!   Q(s,a) ← (1-α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
//!
//! - [`SavedValueTable`]: versioned save file in JSON or MessagePack
//!
//! ## Usage Example
//!
//! ```no_run
//! use qtoe::q_learning::{EpsilonGreedy, LearningParams, ValueTable, run_episode};
//!
//! let mut table = ValueTable::new();
//! let mut policy = EpsilonGreedy::new().with_seed(7);
//! let params = LearningParams::new(0.1, 0.9).unwrap();
//!
//! for _ in 0..1_000 {
//!     run_episode(&mut table, &mut policy, 0.1, params).unwrap();
//! }
//! ```

pub mod agent;
pub mod episode;
pub mod policy;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use episode::{
    DRAW_REWARD, Episode, GameStatus, Transition, WIN_REWARD, play_episode, run_episode,
};
pub use policy::{EpsilonGreedy, validate_epsilon};
pub use q_table::{LearningParams, NextState, ValueTable};
pub use serialization::{SaveFormat, SavedValueTable, TrainingMetadata};
