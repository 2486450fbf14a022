//! Observer implementations for the training pipeline
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{self, BufWriter, Stdout, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::training::TrainingSummary,
    ports::Observer,
    q_learning::{Episode, GameStatus, ValueTable},
    tictactoe::Player,
};

/// Report observer - Prints one line per report episode
///
/// Line format: `Episode {i}: Winner - {p}, Epsilon - {e}` where `p` is the
/// player who made the final move. Ends with `Training complete.`.
pub struct ReportObserver<W: Write + Send> {
    out: W,
}

impl ReportObserver<Stdout> {
    /// Report to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ReportObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Observer for ReportObserver<W> {
    fn on_report(&mut self, index: usize, episode: &Episode, epsilon: f64) -> Result<()> {
        writeln!(
            self.out,
            "Episode {index}: Winner - {}, Epsilon - {epsilon}",
            episode.last_mover
        )?;
        Ok(())
    }

    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        writeln!(self.out, "Training complete.")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    fn message(&self) -> String {
        format!("X:{} O:{} D:{}", self.x_wins, self.o_wins, self.draws)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(
        &mut self,
        index: usize,
        episode: &Episode,
        _table: &ValueTable,
        _epsilon: f64,
    ) -> Result<()> {
        match episode.status {
            GameStatus::Win(Player::X) => self.x_wins += 1,
            GameStatus::Win(Player::O) => self.o_wins += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::InProgress => {}
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(index as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcome rates and game lengths
#[derive(Debug, Default)]
pub struct MetricsObserver {
    total_episodes: usize,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    total_moves: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            count as f64 / self.total_episodes as f64
        }
    }

    pub fn x_win_rate(&self) -> f64 {
        self.rate(self.x_wins)
    }

    pub fn o_win_rate(&self) -> f64 {
        self.rate(self.o_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn avg_game_length(&self) -> f64 {
        self.rate(self.total_moves)
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            x_win_rate: self.x_win_rate(),
            o_win_rate: self.o_win_rate(),
            draw_rate: self.draw_rate(),
            avg_game_length: self.avg_game_length(),
        }
    }
}

/// Snapshot of [`MetricsObserver`] rates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub x_win_rate: f64,
    pub o_win_rate: f64,
    pub draw_rate: f64,
    pub avg_game_length: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_end(
        &mut self,
        _index: usize,
        episode: &Episode,
        _table: &ValueTable,
        _epsilon: f64,
    ) -> Result<()> {
        self.total_episodes += 1;
        self.total_moves += episode.len();
        match episode.status {
            GameStatus::Win(Player::X) => self.x_wins += 1,
            GameStatus::Win(Player::O) => self.o_wins += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::InProgress => {}
        }
        Ok(())
    }
}

/// One JSONL line written by [`JsonlObserver`]
#[derive(Debug, Serialize)]
struct EpisodeObservation<'a> {
    index: usize,
    epsilon: f64,
    #[serde(flatten)]
    episode: &'a Episode,
}

/// JSONL observer - Exports every episode to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create observation file {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(
        &mut self,
        index: usize,
        episode: &Episode,
        _table: &ValueTable,
        epsilon: f64,
    ) -> Result<()> {
        let observation = EpisodeObservation {
            index,
            epsilon,
            episode,
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
