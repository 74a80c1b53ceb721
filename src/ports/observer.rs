//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling training
//! logic to specific output formats or metrics.

use crate::{
    Error, Result,
    tictactoe::{GameOutcome, GameState},
    types::Action,
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during
/// training, such as progress bars for user feedback or outcome metrics.
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each move, after the value update
///    - `on_episode_end(episode, outcome)` or `on_episode_aborted(episode, error)`
/// 3. `on_training_end()` - Once at the end
///
/// An error returned from any hook stops training; it is not treated as an
/// aborted episode.
///
/// # Examples
///
/// ```no_run
/// use ttt_qlearn::{ports::Observer, tictactoe::GameOutcome};
///
/// struct DrawCounter {
///     draws: usize,
/// }
///
/// impl Observer for DrawCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         outcome: GameOutcome,
///     ) -> ttt_qlearn::Result<()> {
///         if outcome == GameOutcome::Draw {
///             self.draws += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts from a freshly reset board.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each applied move.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the current episode
    /// * `step` - Move number within the episode (0-based)
    /// * `before` - Board before the move
    /// * `action` - Coordinate that was played
    /// * `reward` - Reward fed into the value update
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _before: &GameState,
        _action: Action,
        _reward: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode reaches a terminal outcome.
    fn on_episode_end(&mut self, _episode: usize, _outcome: GameOutcome) -> Result<()> {
        Ok(())
    }

    /// Called when an episode is abandoned because of an error.
    fn on_episode_aborted(&mut self, _episode: usize, _error: &Error) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
