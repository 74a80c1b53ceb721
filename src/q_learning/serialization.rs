//! Serialization support for trained Q-learning agents.
//!
//! Agents are stored as MessagePack, which keeps every `f64` bit-exact and
//! every (state key, action) pair intact across a save/load cycle.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::{
    app::AgentConfig,
    q_learning::agent::{AgentState, QLearningAgent},
};

/// Training metadata stored next to the table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Total episodes the table has been trained on
    pub episodes_trained: usize,
    /// Seed of the most recent training run (if any)
    pub seed: Option<u64>,
}

/// Serializable representation of a trained agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQAgent {
    /// Version of the save format
    pub version: u32,
    state: AgentState,
    pub metadata: TrainingMetadata,
}

impl SavedQAgent {
    /// Current save format version
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            state: agent.export_state(),
            metadata,
        }
    }

    pub fn to_agent(&self) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported agent save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }

        QLearningAgent::from_state(self.state.clone(), self.metadata.episodes_trained)
            .context("Saved agent has invalid configuration")
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agent")?;
        writer
            .flush()
            .with_context(|| format!("Failed to write agent to {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize agent")
    }
}

/// Agent bound to a file for the duration of a scope.
///
/// Opening loads the saved table when the file exists and otherwise starts a
/// fresh agent. Mutable access marks the agent dirty; a dirty agent is
/// written back on [`ScopedAgent::flush`] or, failing that, when the guard
/// is dropped.
///
/// ```no_run
/// use ttt_qlearn::{app::AgentConfig, q_learning::ScopedAgent};
///
/// let mut agent = ScopedAgent::open("agent.msgpack", AgentConfig::default())?;
/// agent.metadata_mut().episodes_trained += 1;
/// agent.flush()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct ScopedAgent {
    path: PathBuf,
    agent: QLearningAgent,
    metadata: TrainingMetadata,
    dirty: bool,
}

impl ScopedAgent {
    /// Load the agent at `path`, or create one from `config` if the file is absent.
    ///
    /// An existing file keeps its stored configuration; `config` only applies
    /// to new agents.
    pub fn open<P: AsRef<Path>>(path: P, config: AgentConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (agent, metadata) = if path.exists() {
            let saved = SavedQAgent::load_from_file(&path)?;
            let agent = saved.to_agent()?;
            info!(
                "loaded agent from {} ({} entries, {} episodes)",
                path.display(),
                agent.q_table().len(),
                saved.metadata.episodes_trained
            );
            (agent, saved.metadata)
        } else {
            info!("no agent at {}, starting fresh", path.display());
            (QLearningAgent::new(config)?, TrainingMetadata::default())
        };

        Ok(Self {
            path,
            agent,
            metadata,
            dirty: false,
        })
    }

    /// Start a fresh agent bound to `path`, replacing any file there on flush.
    pub fn create<P: AsRef<Path>>(path: P, config: AgentConfig) -> Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            agent: QLearningAgent::new(config)?,
            metadata: TrainingMetadata::default(),
            dirty: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &TrainingMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut TrainingMetadata {
        self.dirty = true;
        &mut self.metadata
    }

    /// Write the agent to its file if anything changed since the last flush
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        SavedQAgent::from_agent(&self.agent, self.metadata.clone()).save_to_file(&self.path)?;
        self.dirty = false;
        info!(
            "saved agent to {} ({} entries)",
            self.path.display(),
            self.agent.q_table().len()
        );
        Ok(())
    }

    /// Flush and release the agent
    pub fn close(mut self) -> Result<QLearningAgent> {
        self.flush()?;
        let agent = self.agent.clone();
        Ok(agent)
    }
}

impl Deref for ScopedAgent {
    type Target = QLearningAgent;

    fn deref(&self) -> &Self::Target {
        &self.agent
    }
}

impl DerefMut for ScopedAgent {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.dirty = true;
        &mut self.agent
    }
}

impl Drop for ScopedAgent {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            error!("failed to save agent to {}: {err:#}", self.path.display());
        }
    }
}
