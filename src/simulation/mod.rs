//! Monte Carlo estimation of campaign outcomes
//!
//! Sampler -> estimator -> sweeps, with `output` packaging results for
//! whatever renders them.

pub mod estimator;
pub mod output;
pub mod sampler;
pub mod sweep;

pub use estimator::{win_probability, WinProbability};
pub use output::{AttackReport, DefenseReport, DeltaReport, OutcomeBar, OutcomeEntry};
pub use sampler::{simulate, OutcomeDistribution, Simulator};
pub use sweep::{
    marginal_gain, sweep_defense, sweep_defense_with, sweep_delta, sweep_delta_with,
    DefenseImprovement, DeltaSensitivity, MarginalGain,
};
