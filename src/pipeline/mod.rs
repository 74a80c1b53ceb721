//! Training and evaluation pipeline
//!
//! This module provides:
//! - Self-play training of a Q-learning agent
//! - Greedy evaluation against a random opponent
//! - Observers recording progress and metrics during training

pub mod evaluation;
pub mod observers;
pub mod training;

pub use evaluation::{EvaluationResult, evaluate_against_random};
// Re-export observer implementations (adapters)
pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
