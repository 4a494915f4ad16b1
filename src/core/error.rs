use thiserror::Error;

use crate::core::types::{ForceState, RoundLosses};

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Number of runs must be at least 1")]
    ZeroRuns,

    #[error("Die must have at least one face")]
    EmptyDie,

    #[error("Invalid starting force: attackers={attackers}, defenders={defenders} (both must be >= 1)")]
    InvalidForce { attackers: u32, defenders: u32 },

    #[error("Invalid sweep range: {0}")]
    InvalidRange(String),

    #[error("Unknown party: {0:?} (expected \"attacker\" or \"defender\")")]
    UnknownParty(String),

    #[error("Invariant violated: {losses:?} applied to {state} drives a count below zero")]
    InvariantViolation {
        state: ForceState,
        losses: RoundLosses,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RiskError>;
