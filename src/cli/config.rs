//! Run configuration shared by CLI commands
//!
//! A run can be described by a JSON file; command-line flags override the
//! values it contains. Missing sections and fields fall back to defaults.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{app::AgentConfig, pipeline::TrainingConfig};

/// Complete configuration of a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Agent hyper-parameters
    pub agent: AgentConfig,

    /// Episode count and seed
    pub training: TrainingConfig,
}

impl RunConfig {
    /// Load a run configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open config: {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .agent
            .validate()
            .with_context(|| format!("Invalid agent settings in {}", path.display()))?;
        Ok(config)
    }
}
