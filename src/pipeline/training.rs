//! Training pipeline for self-play Q-learning

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Observer,
    q_learning::{
        EpsilonGreedy, GameStatus, LearningParams, TrainingMetadata, ValueTable, run_episode,
        validate_epsilon,
    },
    tictactoe::Player,
};

/// Training configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    /// Number of self-play episodes
    pub episodes: usize,

    /// Exploration rate for the first episode
    pub epsilon: f64,

    /// Multiplier applied to epsilon after each report episode
    pub epsilon_decay: f64,

    /// Floor for the decayed exploration rate
    pub min_epsilon: f64,

    /// Report (and decay) every this many episodes
    pub report_interval: usize,

    /// Learning rate and discount factor
    pub params: LearningParams,

    /// Random seed
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub const DEFAULT_EPISODES: usize = 5_000;
    pub const DEFAULT_EPSILON: f64 = 0.1;
    pub const DEFAULT_EPSILON_DECAY: f64 = 0.99;
    pub const DEFAULT_REPORT_INTERVAL: usize = 20;

    /// Check every field, rejecting out-of-range values instead of clamping.
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::config("episodes must be at least 1"));
        }
        validate_epsilon(self.epsilon)?;

        if !(0.0..=1.0).contains(&self.epsilon_decay) {
            return Err(Error::config(format!(
                "epsilon_decay must be in [0, 1], got {}",
                self.epsilon_decay
            )));
        }
        if !(0.0..=1.0).contains(&self.min_epsilon) {
            return Err(Error::config(format!(
                "min_epsilon must be in [0, 1], got {}",
                self.min_epsilon
            )));
        }
        if self.report_interval == 0 {
            return Err(Error::config("report_interval must be at least 1"));
        }
        Ok(())
    }

    /// Exploration rate after one report-episode decay step
    pub fn decay(&self, epsilon: f64) -> f64 {
        (epsilon * self.epsilon_decay).max(self.min_epsilon)
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: Self::DEFAULT_EPISODES,
            epsilon: Self::DEFAULT_EPSILON,
            epsilon_decay: Self::DEFAULT_EPSILON_DECAY,
            min_epsilon: 0.0,
            report_interval: Self::DEFAULT_REPORT_INTERVAL,
            params: LearningParams::default(),
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Episodes played
    pub episodes: usize,

    /// Episodes won by X
    pub x_wins: usize,

    /// Episodes won by O
    pub o_wins: usize,

    /// Drawn episodes
    pub draws: usize,

    /// Exploration rate at the start
    pub initial_epsilon: f64,

    /// Exploration rate after the last decay
    pub final_epsilon: f64,

    /// Distinct states in the table when training ended
    pub states_learned: usize,

    /// State-action values in the table when training ended
    pub values_learned: usize,
}

impl TrainingSummary {
    fn empty(initial_epsilon: f64) -> Self {
        Self {
            episodes: 0,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            initial_epsilon,
            final_epsilon: initial_epsilon,
            states_learned: 0,
            values_learned: 0,
        }
    }

    fn record(&mut self, status: GameStatus) {
        self.episodes += 1;
        match status {
            GameStatus::Win(Player::X) => self.x_wins += 1,
            GameStatus::Win(Player::O) => self.o_wins += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::InProgress => {}
        }
    }

    pub fn draw_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.draws as f64 / self.episodes as f64
        }
    }

    /// Metadata to store alongside the trained table
    pub fn metadata(&self, config: &TrainingConfig) -> TrainingMetadata {
        TrainingMetadata {
            episodes_trained: Some(self.episodes),
            alpha: Some(config.params.alpha()),
            gamma: Some(config.params.gamma()),
            initial_epsilon: Some(self.initial_epsilon),
            final_epsilon: Some(self.final_epsilon),
            seed: config.seed,
        }
    }
}

/// Self-play training pipeline
///
/// Both sides of every game are played by the same ε-greedy policy over the
/// same table, so each episode trains X and O at once.
pub struct TrainingPipeline {
    config: TrainingConfig,
    policy: EpsilonGreedy,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the config fails
    /// [`TrainingConfig::validate`].
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let policy = match config.seed {
            Some(seed) => EpsilonGreedy::new().with_seed(seed),
            None => EpsilonGreedy::new(),
        };
        Ok(Self {
            config,
            policy,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every configured episode against `table`.
    ///
    /// Episode `i` is played with the current epsilon. When
    /// `i % report_interval == 0` observers get a report and then epsilon
    /// decays, never below `min_epsilon`.
    pub fn run(&mut self, table: &mut ValueTable) -> Result<TrainingSummary> {
        let config = self.config;
        let mut epsilon = config.epsilon;
        let mut summary = TrainingSummary::empty(epsilon);

        log::info!(
            "training for {} episodes (epsilon {}, alpha {}, gamma {})",
            config.episodes,
            config.epsilon,
            config.params.alpha(),
            config.params.gamma()
        );

        for observer in &mut self.observers {
            observer.on_training_start(config.episodes)?;
        }

        for index in 0..config.episodes {
            let episode = run_episode(table, &mut self.policy, epsilon, config.params)?;
            summary.record(episode.status);
            log::debug!(
                "episode {index}: {:?} after {} moves",
                episode.status,
                episode.len()
            );

            for observer in &mut self.observers {
                observer.on_episode_end(index, &episode, table, epsilon)?;
            }

            if index.is_multiple_of(config.report_interval) {
                for observer in &mut self.observers {
                    observer.on_report(index, &episode, epsilon)?;
                }
                let decayed = config.decay(epsilon);
                log::debug!("epsilon {epsilon} -> {decayed}");
                epsilon = decayed;
            }
        }

        summary.final_epsilon = epsilon;
        summary.states_learned = table.state_count();
        summary.values_learned = table.entry_count();

        for observer in &mut self.observers {
            observer.on_training_end(&summary)?;
        }

        log::info!(
            "training complete: {} states, X {} / O {} / draws {}",
            summary.states_learned,
            summary.x_wins,
            summary.o_wins,
            summary.draws
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::q_learning::Episode;

    #[derive(Default)]
    struct Recorder {
        reports: Arc<Mutex<Vec<(usize, f64)>>>,
        ended: Arc<Mutex<bool>>,
    }

    impl Observer for Recorder {
        fn on_report(&mut self, index: usize, _episode: &Episode, epsilon: f64) -> Result<()> {
            self.reports.lock().unwrap().push((index, epsilon));
            Ok(())
        }

        fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
            *self.ended.lock().unwrap() = true;
            Ok(())
        }
    }

    fn config(episodes: usize) -> TrainingConfig {
        TrainingConfig {
            episodes,
            seed: Some(42),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_training_pipeline() {
        let mut table = ValueTable::new();
        let mut pipeline = TrainingPipeline::new(config(100)).unwrap();

        let summary = pipeline.run(&mut table).unwrap();

        assert_eq!(summary.episodes, 100);
        assert_eq!(summary.x_wins + summary.o_wins + summary.draws, 100);
        assert_eq!(summary.states_learned, table.state_count());
        assert!(summary.states_learned > 0);
    }

    #[test]
    fn test_report_cadence_and_decay() {
        let recorder = Recorder::default();
        let reports = Arc::clone(&recorder.reports);
        let ended = Arc::clone(&recorder.ended);

        let cfg = TrainingConfig {
            epsilon: 0.5,
            epsilon_decay: 0.5,
            min_epsilon: 0.1,
            report_interval: 10,
            ..config(35)
        };
        let mut pipeline = TrainingPipeline::new(cfg)
            .unwrap()
            .with_observer(Box::new(recorder));
        let summary = pipeline.run(&mut ValueTable::new()).unwrap();

        let reports = reports.lock().unwrap();
        assert_eq!(
            *reports,
            vec![(0, 0.5), (10, 0.25), (20, 0.125), (30, 0.1)]
        );
        assert!((summary.final_epsilon - 0.1).abs() < 1e-12);
        assert!(*ended.lock().unwrap());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = [
            TrainingConfig {
                episodes: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                epsilon: 1.2,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                epsilon_decay: -0.1,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                report_interval: 0,
                ..TrainingConfig::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(
                TrainingPipeline::new(cfg),
                Err(Error::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = ValueTable::new();
        let mut b = ValueTable::new();
        TrainingPipeline::new(config(200)).unwrap().run(&mut a).unwrap();
        TrainingPipeline::new(config(200)).unwrap().run(&mut b).unwrap();
        assert_eq!(a, b);
    }
}
