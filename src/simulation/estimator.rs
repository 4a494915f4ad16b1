//! Win probability with a binomial uncertainty band
//!
//! The estimate is the share of trials that ended in the party's win set.
//! Treating that share as Binomial(runs, p) / runs gives
//! sd = sqrt(p (1 - p) / runs); the band is p +/- 3 sd clamped to [0, 1].

use serde::{Deserialize, Serialize};

use crate::core::types::Party;
use crate::simulation::sampler::OutcomeDistribution;

/// Width of the reported band in standard deviations
pub const SIGMA_BAND: f64 = 3.0;

/// Decimal places kept in reported probabilities
pub const REPORT_DECIMALS: i32 = 3;

/// Point estimate and +/- 3 sigma band for one party
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinProbability {
    pub party: Party,
    pub p_win: f64,
    pub p_win_low: f64,
    pub p_win_high: f64,
    pub std_dev: f64,
    pub runs: u32,
}

/// Reduce a distribution to `party`'s win probability
pub fn win_probability(distribution: &OutcomeDistribution, party: Party) -> WinProbability {
    let runs = distribution.runs();
    let p_win: f64 = distribution
        .states()
        .filter(|state| state.is_won_by(party))
        .map(|state| distribution.probability(state))
        .sum::<f64>()
        .clamp(0.0, 1.0);

    let std_dev = binomial_std_dev(p_win, runs);
    let low = (p_win - SIGMA_BAND * std_dev).clamp(0.0, 1.0);
    let high = (p_win + SIGMA_BAND * std_dev).clamp(0.0, 1.0);

    WinProbability {
        party,
        p_win: round_report(p_win),
        p_win_low: round_report(low),
        p_win_high: round_report(high),
        std_dev: round_report(std_dev),
        runs,
    }
}

/// Standard deviation of a binomial share estimate
pub fn binomial_std_dev(p: f64, runs: u32) -> f64 {
    if runs == 0 {
        return 0.0;
    }
    (p * (1.0 - p) / runs as f64).max(0.0).sqrt()
}

fn round_report(value: f64) -> f64 {
    let scale = 10f64.powi(REPORT_DECIMALS);
    (value * scale).round() / scale
}

impl WinProbability {
    /// Does `p` fall inside this estimate's band?
    pub fn contains(&self, p: f64) -> bool {
        p >= self.p_win_low && p <= self.p_win_high
    }

    pub fn summary(&self) -> String {
        format!(
            "{} p_win={:.3} (+/-3 sigma: {:.3}..{:.3}, sd={:.3}, runs={})",
            self.party, self.p_win, self.p_win_low, self.p_win_high, self.std_dev, self.runs
        )
    }
}
