//! Application layer: configuration shared by the CLI commands.
//!
//! # Usage
//!
//! ```
//! use qtoe::app::AppConfig;
//!
//! let config = AppConfig::from_toml_str("[training]\nepisodes = 1000\n")?;
//! let training = config.training.to_training_config()?;
//! assert_eq!(training.episodes, 1000);
//! # Ok::<(), qtoe::Error>(())
//! ```

pub mod config;

pub use config::{AppConfig, TrainingSection};
