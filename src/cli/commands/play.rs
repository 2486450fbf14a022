//! Play command - Human vs a trained Q-learning agent

use std::{io, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    cli::{output, shell::InteractiveShell},
    q_learning::{GameStatus, QLearningAgent, SavedValueTable, ValueTable},
    tictactoe::Player,
};

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" => Ok(Player::X),
        "o" | "second" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

#[derive(Parser, Debug)]
#[command(about = "Play against a trained agent")]
pub struct PlayArgs {
    /// Saved agent (.json or MessagePack)
    #[arg(long, short = 'a')]
    pub agent: PathBuf,

    /// Which token the human controls (`x` or `o`); X always moves first
    #[arg(long, default_value = "o")]
    pub human: String,

    /// Random seed for the agent's fallback choices
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run one game on stdin/stdout with exploration disabled.
pub(crate) fn play_interactive(
    table: ValueTable,
    human: Player,
    seed: Option<u64>,
) -> Result<GameStatus> {
    let mut agent = QLearningAgent::new(table);
    if let Some(seed) = seed {
        agent = agent.with_seed(seed);
    }

    let stdin = io::stdin();
    let mut shell = InteractiveShell::new(stdin.lock(), io::stdout());
    shell
        .play_game(&mut agent, human)
        .context("Interactive game ended early")
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let human = parse_player_token(&args.human, "--human")?;

    let saved = SavedValueTable::load_from_file(&args.agent)
        .with_context(|| format!("Failed to load agent from {}", args.agent.display()))?;

    output::print_section("Trained Agent");
    output::print_kv("File", &args.agent.display().to_string());
    if let Some(episodes) = saved.metadata.episodes_trained {
        output::print_kv("Episodes trained", &output::format_number(episodes));
    }
    output::print_kv(
        "States known",
        &output::format_number(saved.table.state_count()),
    );

    let table = saved.into_table()?;
    play_interactive(table, human, args.seed)?;
    Ok(())
}
