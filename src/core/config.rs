//! Simulation configuration with documented defaults
//!
//! Everything here is read-only once a run starts and is shared by every
//! trial of every sampling call.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, RiskError};

/// Default number of Monte Carlo trials per sampling call
pub const DEFAULT_RUNS: u32 = 1000;

/// Default trial count at which the sampler switches to rayon
pub const DEFAULT_PARALLEL_THRESHOLD: u32 = 2000;

/// Configuration for sampling and sweeps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of independent trials per sampling call
    pub runs: u32,

    /// Face values of the die; each roll draws one uniformly
    pub die: Vec<u32>,

    /// Base seed for reproducible runs (None = entropy)
    pub seed: Option<u64>,

    /// Minimum trial count before running trials on the rayon pool
    ///
    /// Below this, thread overhead outweighs the gain; a campaign of a few
    /// dozen units finishes in well under a microsecond.
    pub parallel_threshold: u32,

    /// Wall-clock budget for a sweep in milliseconds
    ///
    /// Once exceeded, no further sweep steps are scheduled; the records
    /// already computed are returned.
    pub deadline_ms: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            die: vec![1, 2, 3, 4, 5, 6],
            seed: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            deadline_ms: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_die(mut self, faces: Vec<u32>) -> Self {
        self.die = faces;
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Validate configuration before any trial runs
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(RiskError::ZeroRuns);
        }
        if self.die.is_empty() {
            return Err(RiskError::EmptyDie);
        }
        Ok(())
    }
}

/// Load a config from a TOML file, filling unspecified fields with defaults
pub fn load_config(path: &Path) -> Result<SimulationConfig> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse a config from TOML text
pub fn parse_config(contents: &str) -> Result<SimulationConfig> {
    let config: SimulationConfig = toml::from_str(contents)
        .map_err(|e| RiskError::Config(format!("Failed to parse config TOML: {}", e)))?;
    config.validate()?;
    Ok(config)
}
