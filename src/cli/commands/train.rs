//! Train command - Self-play Q-learning

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{AppConfig, TrainingSection},
    cli::{
        commands::play::{parse_player_token, play_interactive},
        output,
    },
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, ReportObserver,
        TrainingPipeline, TrainingSummary,
    },
    q_learning::{SavedValueTable, ValueTable},
};

#[derive(Parser, Debug)]
#[command(about = "Train an agent by self-play", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of self-play episodes
    #[arg(long, short = 'n')]
    pub episodes: Option<usize>,

    /// Initial exploration rate
    #[arg(long, short = 'e')]
    pub epsilon: Option<f64>,

    /// Learning rate
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Multiplier applied to epsilon at each report
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Lower bound for the decayed epsilon
    #[arg(long)]
    pub min_epsilon: Option<f64>,

    /// Print a report line (and decay epsilon) every this many episodes
    #[arg(long)]
    pub report_every: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file with a [training] table; flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Output file for the trained table (.json or MessagePack)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Play against the agent once training finishes
    #[arg(long)]
    pub play: bool,

    /// Which token the human controls in --play (`x` or `o`)
    #[arg(long, default_value = "o")]
    pub human: String,
}

impl TrainArgs {
    /// Apply command-line overrides on top of `section`.
    fn apply_overrides(&self, section: &mut TrainingSection) {
        if let Some(episodes) = self.episodes {
            section.episodes = episodes;
        }
        if let Some(epsilon) = self.epsilon {
            section.epsilon = epsilon;
        }
        if let Some(alpha) = self.alpha {
            section.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            section.gamma = gamma;
        }
        if let Some(decay) = self.epsilon_decay {
            section.epsilon_decay = decay;
        }
        if let Some(min_epsilon) = self.min_epsilon {
            section.min_epsilon = min_epsilon;
        }
        if let Some(report_every) = self.report_every {
            section.report_every = report_every;
        }
        if self.seed.is_some() {
            section.seed = self.seed;
        }
    }

    /// Effective `[training]` settings: defaults, then the config file, then
    /// flags.
    pub fn resolve(&self) -> Result<TrainingSection> {
        let mut section = match &self.config {
            Some(path) => {
                AppConfig::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
                    .training
            }
            None => TrainingSection::default(),
        };
        self.apply_overrides(&mut section);
        Ok(section)
    }
}

/// Train a table as described by `args`, reporting to stdout.
pub fn run(args: &TrainArgs) -> Result<(ValueTable, TrainingSummary, MetricsSummary)> {
    let section = args.resolve()?;
    let config = section.to_training_config()?;

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut pipeline = TrainingPipeline::new(config)?
        .with_observer(Box::new(ReportObserver::stdout()))
        .with_observer(Box::new(Arc::clone(&metrics)));
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to open observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let mut table = ValueTable::new();
    let summary = pipeline.run(&mut table)?;
    let metrics = metrics
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();

    if let Some(path) = &args.output {
        SavedValueTable::new(table.clone(), summary.metadata(&config)).save_to_file(path)?;
        println!("Saved trained agent to {}", path.display());
    }

    Ok((table, summary, metrics))
}

pub fn execute(args: TrainArgs) -> Result<()> {
    // Validate before spending time on training.
    let human = parse_player_token(&args.human, "--human")?;

    let (table, summary, metrics) = run(&args)?;
    output::print_training_summary(&summary);
    output::print_metrics(&metrics);

    if args.play {
        output::print_section("Testing the trained AI");
        play_interactive(table, human, args.seed)?;
    }
    Ok(())
}
