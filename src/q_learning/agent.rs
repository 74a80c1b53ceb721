//! Q-learning agent
//!
//! Epsilon-greedy action selection over a [`QTable`] plus the one-step
//! Bellman update. The agent only sees state keys and action lists; it never
//! touches a [`crate::tictactoe::GameState`] directly.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    app::AgentConfig,
    error::{Error, Result},
    q_learning::q_table::QTable,
    types::{Action, StateKey},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentState {
    pub config: AgentConfig,
    pub q_table: QTable,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns the optimal Q* function by always updating toward the maximum
/// next-state value, regardless of the action actually taken next.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    config: AgentConfig,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent with an empty table
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any hyper-parameter is out of range.
    pub fn new(config: AgentConfig) -> Result<Self> {
        Self::with_table(config, QTable::new())
    }

    /// Create an agent around an existing table
    pub fn with_table(config: AgentConfig, q_table: QTable) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table,
            config,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    /// Reseed the exploration RNG
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Stored estimate for the pair, `0.0` when never written
    pub fn value_of(&self, state: &StateKey, action: Action) -> f64 {
        self.q_table.value_of(state, action)
    }

    /// ε-greedy action selection
    ///
    /// With probability ε a uniformly random legal action is returned.
    /// Otherwise the choice is uniform among all actions sharing the highest
    /// stored value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if `legal_actions` is empty.
    pub fn choose_action(&mut self, state: &StateKey, legal_actions: &[Action]) -> Result<Action> {
        if legal_actions.is_empty() {
            return Err(Error::NoValidMoves);
        }

        if self.rng.random::<f64>() < self.config.epsilon {
            // Explore
            legal_actions
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoValidMoves)
        } else {
            self.greedy_action(state, legal_actions)
        }
    }

    /// Exploit only: uniform choice among the maximizing actions
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if `legal_actions` is empty.
    pub fn greedy_action(&mut self, state: &StateKey, legal_actions: &[Action]) -> Result<Action> {
        let best = self.q_table.best_actions(state, legal_actions);
        best.choose(&mut self.rng).copied().ok_or(Error::NoValidMoves)
    }

    /// Apply one Bellman update for an observed transition
    ///
    /// `next_legal_actions` must be empty when the transition ended the
    /// episode, which drops the future term.
    pub fn update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: &StateKey,
        next_legal_actions: &[Action],
    ) {
        debug_assert!(reward.is_finite(), "reward must be finite, got {reward}");
        self.q_table.q_learning_update(
            state,
            action,
            reward,
            next_state,
            next_legal_actions,
            self.config.learning_rate,
            self.config.discount_factor,
        );
    }

    pub(crate) fn export_state(&self) -> AgentState {
        AgentState {
            config: self.config,
            q_table: self.q_table.clone(),
            rng_seed: self.rng_seed,
        }
    }

    /// Rebuild a saved agent.
    ///
    /// A stored seed is advanced by `episodes_trained`, so a resumed run
    /// stays reproducible without replaying the draws of the saved one.
    pub(crate) fn from_state(state: AgentState, episodes_trained: usize) -> Result<Self> {
        let mut agent = Self::with_table(state.config, state.q_table)?;
        if let Some(seed) = state.rng_seed {
            agent.set_rng_seed(resumed_seed(seed, episodes_trained));
        }
        Ok(agent)
    }
}

fn resumed_seed(seed: u64, episodes_trained: usize) -> u64 {
    // Golden-ratio increment spreads consecutive counts across the seed space
    seed ^ (episodes_trained as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
