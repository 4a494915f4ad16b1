//! Simulation output and serialization
//!
//! These records are what a rendering front end consumes: outcome histogram
//! bars, the defense improvement bars with their marginal gains, and the
//! delta curves.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{ForceState, Party};
use crate::simulation::estimator::{win_probability, WinProbability};
use crate::simulation::sampler::OutcomeDistribution;
use crate::simulation::sweep::{marginal_gain, DefenseImprovement, DeltaSensitivity, MarginalGain};

/// One terminal state of a distribution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEntry {
    pub attackers: u32,
    pub defenders: u32,
    pub count: u32,
    pub probability: f64,
}

/// Histogram bar: probability of a party winning with this many units left
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeBar {
    pub party: Party,
    pub remaining_units: u32,
    pub probability: f64,
}

/// Everything known about one attack from a single starting state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttackReport {
    pub initial: ForceState,
    pub runs: u32,
    pub attacker: WinProbability,
    pub defender: WinProbability,
    pub outcomes: Vec<OutcomeEntry>,
    pub bars: Vec<OutcomeBar>,
}

/// Defense sweep records with their marginal gains
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefenseReport {
    pub initial: ForceState,
    pub records: Vec<DefenseImprovement>,
    pub marginal: MarginalGain,
}

/// Delta sweep curves
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeltaReport {
    pub runs: u32,
    pub max_defenders: u32,
    pub curves: Vec<DeltaSensitivity>,
}

/// Distribution entries sorted by state
pub fn outcome_entries(distribution: &OutcomeDistribution) -> Vec<OutcomeEntry> {
    distribution
        .sorted_counts()
        .into_iter()
        .map(|(state, count)| OutcomeEntry {
            attackers: state.attackers,
            defenders: state.defenders,
            count,
            probability: distribution.probability(&state),
        })
        .collect()
}

/// Split terminal states into attacker wins and defender holds
///
/// Attacker bars are keyed by surviving attackers, defender bars by
/// surviving defenders. Each group is sorted by remaining units.
pub fn outcome_bars(distribution: &OutcomeDistribution) -> Vec<OutcomeBar> {
    let mut attacker_bars = Vec::new();
    let mut defender_bars = Vec::new();

    for (state, _) in distribution.sorted_counts() {
        let probability = distribution.probability(&state);
        if state.attacker_won() {
            attacker_bars.push(OutcomeBar {
                party: Party::Attacker,
                remaining_units: state.attackers,
                probability,
            });
        } else {
            defender_bars.push(OutcomeBar {
                party: Party::Defender,
                remaining_units: state.defenders,
                probability,
            });
        }
    }

    attacker_bars.sort_by_key(|bar| bar.remaining_units);
    defender_bars.sort_by_key(|bar| bar.remaining_units);
    attacker_bars.extend(defender_bars);
    attacker_bars
}

impl AttackReport {
    pub fn new(initial: ForceState, distribution: &OutcomeDistribution) -> Self {
        Self {
            initial,
            runs: distribution.runs(),
            attacker: win_probability(distribution, Party::Attacker),
            defender: win_probability(distribution, Party::Defender),
            outcomes: outcome_entries(distribution),
            bars: outcome_bars(distribution),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn summary(&self) -> String {
        format!(
            "Initial conditions: {} ({} runs)\n\
             Attacker win probability: {:.3} (+/-3 sigma: {:.3}..{:.3})\n\
             Defender win probability: {:.3} (+/-3 sigma: {:.3}..{:.3})\n\
             Binomial std: {:.3}",
            self.initial,
            self.runs,
            self.attacker.p_win,
            self.attacker.p_win_low,
            self.attacker.p_win_high,
            self.defender.p_win,
            self.defender.p_win_low,
            self.defender.p_win_high,
            self.attacker.std_dev,
        )
    }
}

impl DefenseReport {
    pub fn new(initial: ForceState, records: Vec<DefenseImprovement>) -> Self {
        let marginal = marginal_gain(&records);
        Self {
            initial,
            records,
            marginal,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Defense sweep from {} ({} steps)",
            self.initial,
            self.records.len()
        )];
        for (record, gain) in self.records.iter().zip(&self.marginal.gains) {
            let gain = match gain {
                Some(g) => format!("{:+.3}", g),
                None => "baseline".to_string(),
            };
            lines.push(format!(
                "  {:>3} defenders: p_win {:.3} [{:.3}..{:.3}] {}",
                record.defenders, record.p_win, record.p_win_low, record.p_win_high, gain
            ));
        }
        match self.marginal.best_additional_units {
            Some(units) => lines.push(format!(
                "Best defence improvement: {} additional units",
                units
            )),
            None => lines.push("Best defence improvement: undefined (single step)".to_string()),
        }
        lines.join("\n")
    }
}

impl DeltaReport {
    pub fn new(runs: u32, max_defenders: u32, curves: Vec<DeltaSensitivity>) -> Self {
        Self {
            runs,
            max_defenders,
            curves,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Delta sweep: {} curves, defenders 1..={}, {} runs per point",
            self.curves.len(),
            self.max_defenders,
            self.runs
        )];
        for curve in &self.curves {
            let first = curve.p_win.first().copied().unwrap_or(0.0);
            let last = curve.p_win.last().copied().unwrap_or(0.0);
            lines.push(format!(
                "  delta {:+3}: attacker p_win {:.3} at 1 defender -> {:.3} at {} defenders",
                curve.delta,
                first,
                last,
                curve.defenders.last().copied().unwrap_or(0)
            ));
        }
        lines.join("\n")
    }
}
