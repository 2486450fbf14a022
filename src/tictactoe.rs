//! Tic-Tac-Toe board model

pub mod board;

pub use board::{Board, Cell, Player};
