//! Observer adapters for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Observer,
    tictactoe::{GameOutcome, GameState, Player},
    types::Action,
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    aborted: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            aborted: 0,
        }
    }

    fn message(&self) -> String {
        let mut message = format!("X:{} O:{} D:{}", self.x_wins, self.o_wins, self.draws);
        if self.aborted > 0 {
            message.push_str(&format!(" aborted:{}", self.aborted));
        }
        message
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

    fn on_episode_end(&mut self, episode: usize, outcome: GameOutcome) -> Result<()> {
        match outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Ongoing => {}
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_episode_aborted(&mut self, episode: usize, _error: &Error) -> Result<()> {
        self.aborted += 1;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcome counts and episode lengths
pub struct MetricsObserver {
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    aborted: usize,
    episode_lengths: Vec<usize>,
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub completed: usize,
    pub aborted: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub draw_rate: f64,
    pub avg_episode_length: f64,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            aborted: 0,
            episode_lengths: Vec::new(),
        }
    }

    fn completed(&self) -> usize {
        self.x_wins + self.o_wins + self.draws
    }

    /// Share of completed episodes that ended in a draw
    pub fn draw_rate(&self) -> f64 {
        let completed = self.completed();
        if completed == 0 {
            0.0
        } else {
            self.draws as f64 / completed as f64
        }
    }

    /// Average number of moves per episode (aborted episodes included)
    pub fn avg_episode_length(&self) -> f64 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().sum::<usize>() as f64 / self.episode_lengths.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            completed: self.completed(),
            aborted: self.aborted,
            x_wins: self.x_wins,
            o_wins: self.o_wins,
            draws: self.draws,
            draw_rate: self.draw_rate(),
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.episode_lengths.push(0);
        Ok(())
    }

    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _before: &GameState,
        _action: Action,
        _reward: f64,
    ) -> Result<()> {
        if let Some(last) = self.episode_lengths.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, outcome: GameOutcome) -> Result<()> {
        match outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Ongoing => {}
        }
        Ok(())
    }

    fn on_episode_aborted(&mut self, _episode: usize, _error: &Error) -> Result<()> {
        self.aborted += 1;
        Ok(())
    }
}

/// Shares an observer with the caller while the pipeline owns the box
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use ttt_qlearn::pipeline::{MetricsObserver, SharedObserver};
///
/// let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
/// let observer = SharedObserver::new(Arc::clone(&metrics));
/// # drop(observer);
/// ```
pub struct SharedObserver<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> SharedObserver<T> {
    pub fn new(inner: Arc<Mutex<T>>) -> Self {
        Self { inner }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        // A panicking observer must not hide the data collected so far
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Observer> Observer for SharedObserver<T> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.lock().on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.lock().on_episode_start(episode)
    }

    fn on_step(
        &mut self,
        episode: usize,
        step: usize,
        before: &GameState,
        action: Action,
        reward: f64,
    ) -> Result<()> {
        self.lock().on_step(episode, step, before, action, reward)
    }

    fn on_episode_end(&mut self, episode: usize, outcome: GameOutcome) -> Result<()> {
        self.lock().on_episode_end(episode, outcome)
    }

    fn on_episode_aborted(&mut self, episode: usize, error: &Error) -> Result<()> {
        self.lock().on_episode_aborted(episode, error)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock().on_training_end()
    }
}
