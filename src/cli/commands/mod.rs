//! Subcommands of the `qtoe` binary

pub mod play;
pub mod train;
