//! Training pipeline abstractions
//!
//! This module provides:
//! - The self-play training driver with epsilon decay
//! - Observers for reports, progress bars, metrics and JSONL export

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, ReportObserver,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingSummary};

pub use crate::ports::Observer;
