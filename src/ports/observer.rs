//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing self-play training,
//! allowing composable reporting without coupling the learning loop to
//! specific output formats or metrics.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    Result,
    pipeline::training::TrainingSummary,
    q_learning::{Episode, ValueTable},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different kinds of data during
/// training, for example:
/// - Periodic report lines
/// - Progress bars for user feedback
/// - JSONL export of every episode
/// - Outcome tallies
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_end(...)` - After the episode's last update
///    - `on_report(...)` - Only on report episodes, before epsilon decays
/// 3. `on_training_end(summary)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use qtoe::{
///     ports::Observer,
///     q_learning::{Episode, ValueTable},
/// };
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(
///         &mut self,
///         _index: usize,
///         _episode: &Episode,
///         _table: &ValueTable,
///         _epsilon: f64,
///     ) -> qtoe::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every episode.
    ///
    /// # Parameters
    ///
    /// * `index` - Index of the episode (0-based)
    /// * `episode` - Full record of the finished game
    /// * `table` - Value table after the episode's updates
    /// * `epsilon` - Exploration rate the episode was played with
    fn on_episode_end(
        &mut self,
        _index: usize,
        _episode: &Episode,
        _table: &ValueTable,
        _epsilon: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called on report episodes (`index % report_interval == 0`).
    ///
    /// `epsilon` is the rate used for this episode, before the decay that
    /// follows the report.
    fn on_report(&mut self, _index: usize, _episode: &Episode, _epsilon: f64) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// This is the last method called in the observation lifecycle.
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        Ok(())
    }
}

/// A shared observer forwards every event to the observer behind the lock,
/// so the caller keeps a handle it can read once the pipeline is done.
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_start(total_episodes)
    }

    fn on_episode_end(
        &mut self,
        index: usize,
        episode: &Episode,
        table: &ValueTable,
        epsilon: f64,
    ) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_episode_end(index, episode, table, epsilon)
    }

    fn on_report(&mut self, index: usize, episode: &Episode, epsilon: f64) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_report(index, episode, epsilon)
    }

    fn on_training_end(&mut self, summary: &TrainingSummary) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_end(summary)
    }
}
