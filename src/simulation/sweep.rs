//! Parameter sweeps over force sizes
//!
//! - Defense sweep: grow the defender one unit at a time against a fixed
//!   attacker and find the unit that buys the most win probability.
//! - Delta sweep: for each attacker-minus-defender gap, trace the attacker's
//!   win probability across defender sizes.
//!
//! Steps run in ascending order. A configured deadline stops scheduling new
//! steps; records already produced are kept.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, RiskError};
use crate::core::types::{ForceState, Party};
use crate::simulation::estimator::{win_probability, REPORT_DECIMALS};
use crate::simulation::sampler::{mix_seed, Simulator};

/// Smallest attacker that can roll at least one die
pub const MIN_ATTACKERS: u32 = 2;

/// Gaps swept by default, largest attacker advantage first
pub const DEFAULT_DELTAS: [i32; 11] = [10, 8, 5, 2, 1, 0, -1, -2, -5, -8, -10];

/// Largest defender count swept by default in the delta sweep
pub const DEFAULT_MAX_DEFENDERS: u32 = 65;

/// Defender win probability at one defender size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefenseImprovement {
    pub defenders: u32,
    pub p_win: f64,
    pub p_win_low: f64,
    pub p_win_high: f64,
}

/// Per-step marginal gains of a defense sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalGain {
    /// Extra defenders, relative to the first record, at the best step
    pub best_additional_units: Option<u32>,
    /// `gains[i] = p_win[i] - p_win[i - 1]`; the first step has none
    pub gains: Vec<Option<f64>>,
}

/// Attacker win probability curve for one fixed gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaSensitivity {
    pub delta: i32,
    pub defenders: Vec<u32>,
    pub attackers: Vec<u32>,
    pub p_win: Vec<f64>,
    pub p_win_low: Vec<f64>,
    pub p_win_high: Vec<f64>,
}

impl DeltaSensitivity {
    fn new(delta: i32) -> Self {
        Self {
            delta,
            defenders: Vec::new(),
            attackers: Vec::new(),
            p_win: Vec::new(),
            p_win_low: Vec::new(),
            p_win_high: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.defenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defenders.is_empty()
    }
}

/// Attacker size for a given defender size and gap, never below two
pub fn attackers_for_delta(defenders: u32, delta: i32) -> u32 {
    let attackers = defenders as i64 + delta as i64;
    attackers.clamp(MIN_ATTACKERS as i64, u32::MAX as i64) as u32
}

/// Defense sweep with the standard die and an entropy seed
pub fn sweep_defense(
    start_defenders: u32,
    attackers: u32,
    max_defenders: u32,
    runs: u32,
) -> Result<Vec<DefenseImprovement>> {
    let config = SimulationConfig::default().with_runs(runs);
    sweep_defense_with(&config, start_defenders, attackers, max_defenders)
}

/// Defender win probability for every size in `start_defenders..=max_defenders`
pub fn sweep_defense_with(
    config: &SimulationConfig,
    start_defenders: u32,
    attackers: u32,
    max_defenders: u32,
) -> Result<Vec<DefenseImprovement>> {
    if attackers < 1 || start_defenders < 1 {
        return Err(RiskError::InvalidForce {
            attackers,
            defenders: start_defenders,
        });
    }
    if max_defenders < start_defenders {
        return Err(RiskError::InvalidRange(format!(
            "max_defenders ({}) is below the starting defender count ({})",
            max_defenders, start_defenders
        )));
    }

    let simulator = Simulator::from_config(config)?;
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let started = Instant::now();

    tracing::info!(
        "Defense sweep: {} attackers vs {}..={} defenders, {} runs per step",
        attackers,
        start_defenders,
        max_defenders,
        simulator.runs()
    );

    let mut records = Vec::with_capacity((max_defenders - start_defenders + 1) as usize);
    for (step, defenders) in (start_defenders..=max_defenders).enumerate() {
        if deadline_passed(config, started) {
            tracing::warn!(
                "Defense sweep deadline reached after {} of {} steps",
                records.len(),
                max_defenders - start_defenders + 1
            );
            break;
        }

        let distribution = simulator
            .with_seed(mix_seed(base_seed, step as u64))
            .simulate(ForceState::new(attackers, defenders), true)?;
        let estimate = win_probability(&distribution, Party::Defender);

        tracing::debug!("  {} defenders -> defender p_win {:.3}", defenders, estimate.p_win);

        records.push(DefenseImprovement {
            defenders,
            p_win: estimate.p_win,
            p_win_low: estimate.p_win_low,
            p_win_high: estimate.p_win_high,
        });
    }

    tracing::info!("Defense sweep finished: {} steps", records.len());
    Ok(records)
}

/// Marginal gain of each step and the step with the largest one
///
/// Gains are compared at the estimator's reporting precision, so steps that
/// tie after rounding resolve to the smallest defender count.
pub fn marginal_gain(records: &[DefenseImprovement]) -> MarginalGain {
    let scale = 10f64.powi(REPORT_DECIMALS);
    let mut gains = Vec::with_capacity(records.len());
    let mut best: Option<(usize, i64)> = None;

    for (i, record) in records.iter().enumerate() {
        if i == 0 {
            gains.push(None);
            continue;
        }
        let steps = ((record.p_win - records[i - 1].p_win) * scale).round() as i64;
        gains.push(Some(steps as f64 / scale));

        if best.map_or(true, |(_, best_steps)| steps > best_steps) {
            best = Some((i, steps));
        }
    }

    let best_additional_units =
        best.map(|(i, _)| records[i].defenders.saturating_sub(records[0].defenders));

    MarginalGain {
        best_additional_units,
        gains,
    }
}

/// Delta sweep over an explicit die with an entropy seed
pub fn sweep_delta(
    deltas: &[i32],
    max_defenders: u32,
    die_faces: &[u32],
    runs: u32,
) -> Result<Vec<DeltaSensitivity>> {
    let config = SimulationConfig::default()
        .with_runs(runs)
        .with_die(die_faces.to_vec());
    sweep_delta_with(&config, deltas, max_defenders)
}

/// Attacker win curve over defenders `1..=max_defenders` for every delta
pub fn sweep_delta_with(
    config: &SimulationConfig,
    deltas: &[i32],
    max_defenders: u32,
) -> Result<Vec<DeltaSensitivity>> {
    if deltas.is_empty() {
        return Err(RiskError::InvalidRange("no deltas given".to_string()));
    }
    if max_defenders < 1 {
        return Err(RiskError::InvalidRange(
            "max_defenders must be at least 1".to_string(),
        ));
    }

    let simulator = Simulator::from_config(config)?;
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let started = Instant::now();

    tracing::info!(
        "Delta sweep: {} deltas x {} defender sizes, {} runs per step",
        deltas.len(),
        max_defenders,
        simulator.runs()
    );

    let mut curves = Vec::with_capacity(deltas.len());
    'deltas: for (delta_index, &delta) in deltas.iter().enumerate() {
        let delta_seed = mix_seed(base_seed, delta_index as u64);
        let mut curve = DeltaSensitivity::new(delta);

        for defenders in 1..=max_defenders {
            if deadline_passed(config, started) {
                tracing::warn!(
                    "Delta sweep deadline reached during delta {} at {} defenders",
                    delta,
                    defenders
                );
                if !curve.is_empty() {
                    curves.push(curve);
                }
                break 'deltas;
            }

            let attackers = attackers_for_delta(defenders, delta);
            let distribution = simulator
                .with_seed(mix_seed(delta_seed, defenders as u64))
                .simulate(ForceState::new(attackers, defenders), true)?;
            let estimate = win_probability(&distribution, Party::Attacker);

            curve.defenders.push(defenders);
            curve.attackers.push(attackers);
            curve.p_win.push(estimate.p_win);
            curve.p_win_low.push(estimate.p_win_low);
            curve.p_win_high.push(estimate.p_win_high);
        }

        tracing::debug!("  delta {:+} -> {} points", delta, curve.len());
        curves.push(curve);
    }

    tracing::info!("Delta sweep finished: {} curves", curves.len());
    Ok(curves)
}

fn deadline_passed(config: &SimulationConfig, started: Instant) -> bool {
    config
        .deadline()
        .map_or(false, |deadline| started.elapsed() >= deadline)
}
