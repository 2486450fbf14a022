//! CLI infrastructure for qtoe
//!
//! This module provides the command-line interface for training agents by
//! self-play and playing against them.

pub mod commands;
pub mod output;
pub mod shell;

pub use shell::InteractiveShell;
