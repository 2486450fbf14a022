//! Tabular Q-learning for tic-tac-toe
//!
//! This crate provides:
//! - Tic-tac-toe board model with win/draw detection and canonical state keys
//! - A lazily grown Q-value table with the one-step Q-learning update
//! - ε-greedy action selection with deterministic tie-breaking
//! - A self-play training pipeline with epsilon decay and pluggable observers
//! - Versioned persistence of trained tables (JSON or MessagePack)
//! - A command-line front-end for training and playing against the agent

pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use q_learning::{EpsilonGreedy, LearningParams, ValueTable};
pub use tictactoe::{Board, Player};
pub use types::{Action, StateKey};
