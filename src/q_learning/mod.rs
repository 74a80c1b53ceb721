//! Q-learning temporal difference learning
//!
//! This module implements tabular Q-learning for the Tic-Tac-Toe game.
//! Q-learning bootstraps each value estimate from the best estimate of the
//! successor state, so values propagate backward from terminal rewards as
//! episodes accumulate.
//!
//! ## Update rule
//!
//! ```text
//! Q(s,a) ← (1-α)·Q(s,a) + α·[r + γ·max_a' Q(s',a')]
//! ```
//!
//! The maximum is taken over the legal actions of `s'` and is `0.0` when the
//! transition ended the episode.
//!
//! ## Usage Example
//!
//! ```
//! use ttt_qlearn::{app::AgentConfig, q_learning::QLearningAgent, tictactoe::GameState};
//!
//! let mut agent = QLearningAgent::new(AgentConfig::new(0.2, 0.5, 0.9)?)?.with_seed(42);
//! let mut game = GameState::new();
//!
//! let state = game.state_key();
//! let action = agent.choose_action(&state, &game.legal_actions())?;
//! let outcome = game.apply_action(action)?;
//! agent.update(
//!     state,
//!     action,
//!     outcome.reward(),
//!     &game.state_key(),
//!     &game.legal_actions(),
//! );
//! # Ok::<(), ttt_qlearn::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use q_table::QTable;
pub use serialization::{SavedQAgent, ScopedAgent, TrainingMetadata};
