//! Configuration types for agent creation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hyper-parameters of a [`crate::q_learning::QLearningAgent`].
///
/// Values are fixed once an agent is built. Use [`AgentConfig::new`] (or
/// [`AgentConfig::validate`] on a deserialized value) to reject out-of-range
/// parameters; nothing is ever clamped.
///
/// # Examples
///
/// ```
/// use ttt_qlearn::app::AgentConfig;
///
/// let config = AgentConfig::new(0.2, 0.5, 0.9)?;
/// assert_eq!(config.epsilon, 0.2);
///
/// assert!(AgentConfig::new(1.5, 0.5, 0.9).is_err());
/// # Ok::<(), ttt_qlearn::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Exploration rate ε in [0, 1]
    pub epsilon: f64,
    /// Learning rate α in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ in [0, 1]
    pub discount_factor: f64,
}

impl AgentConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any value is outside its range.
    pub fn new(epsilon: f64, learning_rate: f64, discount_factor: f64) -> Result<Self> {
        let config = Self {
            epsilon,
            learning_rate,
            discount_factor,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the exploration rate.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Check every parameter against its documented range.
    ///
    /// NaN fails every range check.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::invalid_config(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::invalid_config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::invalid_config(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            learning_rate: 0.5,
            discount_factor: 0.9,
        }
    }
}
