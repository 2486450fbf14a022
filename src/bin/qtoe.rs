//! qtoe CLI - Self-play Q-learning for tic-tac-toe
//!
//! This CLI provides:
//! - Training an agent by self-play with periodic reports
//! - Playing against a trained agent in the terminal

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qtoe")]
#[command(version, about = "Tabular Q-learning tic-tac-toe agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent by self-play
    Train(Box<qtoe::cli::commands::train::TrainArgs>),

    /// Play against a saved agent
    Play(qtoe::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => qtoe::cli::commands::train::execute(*args),
        Commands::Play(args) => qtoe::cli::commands::play::execute(args),
    }
}
