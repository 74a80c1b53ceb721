//! Tabular Q-learning for Tic-Tac-Toe
//!
//! This crate provides:
//! - A Tic-Tac-Toe board with move validation and outcome detection
//! - A Q-learning agent with ε-greedy selection and a sparse value table
//! - A self-play training pipeline with composable observers
//! - Persistence of trained agents and evaluation against a random player
//!
//! # Example
//!
//! ```
//! use ttt_qlearn::{
//!     AgentConfig, QLearningAgent,
//!     pipeline::{TrainingConfig, TrainingPipeline},
//! };
//!
//! let mut agent = QLearningAgent::new(AgentConfig::new(0.2, 0.5, 0.9)?)?;
//! let result = TrainingPipeline::new(TrainingConfig {
//!     episodes: 100,
//!     seed: Some(7),
//! })
//! .run(&mut agent)?;
//!
//! assert_eq!(result.completed, 100);
//! assert!(!agent.q_table().is_empty());
//! assert!(agent.q_table().state_count() > 0);
//! # Ok::<(), ttt_qlearn::Error>(())
//! ```

pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use app::AgentConfig;
pub use error::{Error, Result};
pub use q_learning::{QLearningAgent, QTable};
pub use tictactoe::{GameOutcome, GameState, Player};
pub use types::{Action, StateKey};
