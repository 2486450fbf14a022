//! Application configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::TrainingConfig,
    q_learning::LearningParams,
};

/// `[training]` table of the configuration file
///
/// Keys match the `train` command's flags with dashes turned into
/// underscores. Missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingSection {
    pub episodes: usize,
    pub epsilon: f64,
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    pub report_every: usize,
    pub seed: Option<u64>,
}

impl Default for TrainingSection {
    fn default() -> Self {
        let params = LearningParams::default();
        Self {
            episodes: TrainingConfig::DEFAULT_EPISODES,
            epsilon: TrainingConfig::DEFAULT_EPSILON,
            alpha: params.alpha(),
            gamma: params.gamma(),
            epsilon_decay: TrainingConfig::DEFAULT_EPSILON_DECAY,
            min_epsilon: 0.0,
            report_every: TrainingConfig::DEFAULT_REPORT_INTERVAL,
            seed: None,
        }
    }
}

impl TrainingSection {
    /// Build a validated [`TrainingConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for any out-of-range value.
    pub fn to_training_config(&self) -> Result<TrainingConfig> {
        let config = TrainingConfig {
            episodes: self.episodes,
            epsilon: self.epsilon,
            epsilon_decay: self.epsilon_decay,
            min_epsilon: self.min_epsilon,
            report_interval: self.report_every,
            params: LearningParams::new(self.alpha, self.gamma)?,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub training: TrainingSection,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!(
                "config file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        self.training.to_training_config().map(|_| ())
    }
}
