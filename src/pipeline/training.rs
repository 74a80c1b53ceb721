//! Self-play training loop

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Observer,
    q_learning::QLearningAgent,
    tictactoe::{GameOutcome, GameState, Player},
    types::Action,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of self-play episodes
    pub episodes: usize,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes attempted
    pub episodes: usize,

    /// Episodes that reached a terminal outcome
    pub completed: usize,

    /// Episodes abandoned because of an error
    pub aborted: usize,

    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,

    pub x_win_rate: f64,
    pub o_win_rate: f64,
    pub draw_rate: f64,

    /// Entries in the value table after training
    pub table_size: usize,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(
        episodes: usize,
        aborted: usize,
        x_wins: usize,
        o_wins: usize,
        draws: usize,
        table_size: usize,
    ) -> Self {
        let completed = x_wins + o_wins + draws;
        let rate = |count: usize| {
            if completed > 0 {
                count as f64 / completed as f64
            } else {
                0.0
            }
        };

        Self {
            episodes,
            completed,
            aborted,
            x_wins,
            o_wins,
            draws,
            x_win_rate: rate(x_wins),
            o_win_rate: rate(o_wins),
            draw_rate: rate(draws),
            table_size,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

enum EpisodeReport {
    Finished(GameOutcome),
    Aborted(Error),
}

/// Self-play training pipeline
///
/// A single agent chooses the moves of both players. Every applied move is
/// fed back as one transition, with the reward of [`GameOutcome::reward`]
/// and an empty successor action set once the game is over.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run the configured number of episodes against `agent`
    ///
    /// An error inside an episode abandons that episode only; training
    /// continues with the next one. Observer errors stop the run.
    pub fn run(&mut self, agent: &mut QLearningAgent) -> Result<TrainingResult> {
        self.run_from(agent, |_, game| game.reset())
    }

    /// Same as [`TrainingPipeline::run`], with `prepare` setting up the
    /// board before each episode
    fn run_from<F>(&mut self, agent: &mut QLearningAgent, mut prepare: F) -> Result<TrainingResult>
    where
        F: FnMut(usize, &mut GameState),
    {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed);
        }

        let episodes = self.config.episodes;
        let config = agent.config();
        info!(
            "training for {episodes} episodes (epsilon={}, alpha={}, gamma={})",
            config.epsilon, config.learning_rate, config.discount_factor
        );

        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let mut x_wins = 0;
        let mut o_wins = 0;
        let mut draws = 0;
        let mut aborted = 0;
        let mut game = GameState::new();

        for episode in 0..episodes {
            prepare(episode, &mut game);
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            match self.play_episode(episode, agent, &mut game)? {
                EpisodeReport::Finished(outcome) => {
                    match outcome {
                        GameOutcome::Win(Player::X) => x_wins += 1,
                        GameOutcome::Win(Player::O) => o_wins += 1,
                        GameOutcome::Draw => draws += 1,
                        GameOutcome::Ongoing => unreachable!("episodes finish on terminal outcomes"),
                    }
                    debug!("episode {episode} finished: {outcome:?}");

                    for observer in &mut self.observers {
                        observer.on_episode_end(episode, outcome)?;
                    }
                }
                EpisodeReport::Aborted(err) => {
                    aborted += 1;
                    warn!(
                        "episode {episode} aborted at state {}: {err}",
                        game.state_key()
                    );

                    for observer in &mut self.observers {
                        observer.on_episode_aborted(episode, &err)?;
                    }
                }
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::new(
            episodes,
            aborted,
            x_wins,
            o_wins,
            draws,
            agent.q_table().len(),
        );
        info!(
            "training finished: {} completed, {} aborted, {} table entries",
            result.completed, result.aborted, result.table_size
        );
        Ok(result)
    }

    fn play_episode(
        &mut self,
        episode: usize,
        agent: &mut QLearningAgent,
        game: &mut GameState,
    ) -> Result<EpisodeReport> {
        for step in 0.. {
            let before = game.clone();
            let (action, outcome) = match Self::step(agent, game) {
                Ok(transition) => transition,
                Err(err) => return Ok(EpisodeReport::Aborted(err)),
            };

            for observer in &mut self.observers {
                observer.on_step(episode, step, &before, action, outcome.reward())?;
            }

            if outcome.is_terminal() {
                return Ok(EpisodeReport::Finished(outcome));
            }
        }
        unreachable!("every move fills a cell, so episodes end within nine steps")
    }

    /// Choose, apply and learn from a single move
    fn step(agent: &mut QLearningAgent, game: &mut GameState) -> Result<(Action, GameOutcome)> {
        let state = game.state_key();
        let action = agent.choose_action(&state, &game.legal_actions())?;
        let outcome = game.apply_action(action)?;

        let next_legal = if outcome.is_terminal() {
            Vec::new()
        } else {
            game.legal_actions()
        };
        agent.update(
            state,
            action,
            outcome.reward(),
            &game.state_key(),
            &next_legal,
        );

        Ok((action, outcome))
    }
}
