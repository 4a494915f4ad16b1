pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, SimulationConfig};
pub use error::{Result, RiskError};
pub use types::{ForceState, Party, RoundLosses};
