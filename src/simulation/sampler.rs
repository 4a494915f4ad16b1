//! Repeated-trial sampling of campaign outcomes
//!
//! Every trial owns a ChaCha8 stream seeded from the run's base seed and the
//! trial index, so a seeded run yields the same distribution whether trials
//! run sequentially or on the rayon pool.

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::campaign::run_campaign;
use crate::combat::Die;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, RiskError};
use crate::core::types::ForceState;

/// Empirical distribution of terminal states over a set of trials
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeDistribution {
    counts: AHashMap<ForceState, u32>,
    runs: u32,
    normalized: bool,
}

impl OutcomeDistribution {
    fn from_counts(counts: AHashMap<ForceState, u32>, runs: u32, normalized: bool) -> Self {
        Self {
            counts,
            runs,
            normalized,
        }
    }

    /// Number of trials the distribution was built from
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Whether `value` reports probabilities rather than raw counts
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Number of distinct terminal states observed
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, state: &ForceState) -> u32 {
        self.counts.get(state).copied().unwrap_or(0)
    }

    pub fn probability(&self, state: &ForceState) -> f64 {
        self.count(state) as f64 / self.runs as f64
    }

    /// Count or probability, depending on how the distribution was requested
    pub fn value(&self, state: &ForceState) -> f64 {
        if self.normalized {
            self.probability(state)
        } else {
            self.count(state) as f64
        }
    }

    /// Observed terminal states, in no particular order
    pub fn states(&self) -> impl Iterator<Item = &ForceState> + '_ {
        self.counts.keys()
    }

    /// (state, count) pairs sorted by state
    pub fn sorted_counts(&self) -> Vec<(ForceState, u32)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(s, c)| (*s, *c)).collect();
        entries.sort_unstable();
        entries
    }

    /// Sum of probabilities over all observed states (1.0 up to rounding)
    pub fn total_probability(&self) -> f64 {
        self.counts.keys().map(|s| self.probability(s)).sum()
    }
}

/// Runs campaigns from a fixed starting state and tallies where they end
#[derive(Debug, Clone)]
pub struct Simulator {
    die: Die,
    runs: u32,
    seed: Option<u64>,
    parallel_threshold: u32,
}

impl Simulator {
    /// Build a simulator from a validated config
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            die: Die::new(config.die.clone())?,
            runs: config.runs,
            seed: config.seed,
            parallel_threshold: config.parallel_threshold,
        })
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn die(&self) -> &Die {
        &self.die
    }

    /// Same simulator on an independent seeded stream
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self.clone()
        }
    }

    /// Run all trials from `initial` and build the outcome distribution
    pub fn simulate(&self, initial: ForceState, normalize: bool) -> Result<OutcomeDistribution> {
        if self.runs == 0 {
            return Err(RiskError::ZeroRuns);
        }
        if initial.attackers < 1 || initial.defenders < 1 {
            return Err(RiskError::InvalidForce {
                attackers: initial.attackers,
                defenders: initial.defenders,
            });
        }

        let base_seed = self.seed.unwrap_or_else(rand::random);
        let parallel = self.runs >= self.parallel_threshold;

        tracing::debug!(
            "Sampling {} trials from {} ({})",
            self.runs,
            initial,
            if parallel { "parallel" } else { "sequential" }
        );

        let counts = if parallel {
            (0..self.runs)
                .into_par_iter()
                .map(|trial| self.run_trial(initial, base_seed, trial))
                .try_fold(AHashMap::new, |mut tally, terminal| {
                    *tally.entry(terminal?).or_insert(0u32) += 1;
                    Ok::<_, RiskError>(tally)
                })
                .try_reduce(AHashMap::new, |a, b| Ok(merge_counts(a, b)))?
        } else {
            let mut tally = AHashMap::new();
            for trial in 0..self.runs {
                let terminal = self.run_trial(initial, base_seed, trial)?;
                *tally.entry(terminal).or_insert(0u32) += 1;
            }
            tally
        };

        Ok(OutcomeDistribution::from_counts(counts, self.runs, normalize))
    }

    fn run_trial(&self, initial: ForceState, base_seed: u64, trial: u32) -> Result<ForceState> {
        let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(trial as u64));
        run_campaign(initial, &self.die, &mut rng)
    }
}

/// Sample `runs` campaigns with the standard die and an entropy seed
pub fn simulate(initial: ForceState, runs: u32, normalize: bool) -> Result<OutcomeDistribution> {
    let config = SimulationConfig::default().with_runs(runs);
    Simulator::from_config(&config)?.simulate(initial, normalize)
}

fn merge_counts(
    mut into: AHashMap<ForceState, u32>,
    from: AHashMap<ForceState, u32>,
) -> AHashMap<ForceState, u32> {
    if into.len() < from.len() {
        return merge_counts(from, into);
    }
    for (state, count) in from {
        *into.entry(state).or_insert(0) += count;
    }
    into
}

/// Derive an independent seed for sub-stream `stream` of `base`
///
/// SplitMix64 finalizer; neighbouring streams land far apart.
pub(crate) fn mix_seed(base: u64, stream: u64) -> u64 {
    let mut z = base.wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(runs: u32, seed: u64) -> Simulator {
        Simulator::from_config(&SimulationConfig::default().with_runs(runs).with_seed(seed)).unwrap()
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let dist = seeded(1000, 42).simulate(ForceState::new(8, 4), true).unwrap();
        assert!((dist.total_probability() - 1.0).abs() < 1e-6);

        let value_sum: f64 = dist.states().map(|s| dist.value(s)).sum();
        assert!((value_sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_raw_counts_sum_to_runs() {
        let dist = seeded(500, 42).simulate(ForceState::new(6, 4), false).unwrap();
        let total: f64 = dist.states().map(|s| dist.value(s)).sum();
        assert_eq!(total, 500.0);
        assert!(!dist.is_normalized());
    }

    #[test]
    fn test_terminal_start_is_certain() {
        let dist = seeded(250, 42).simulate(ForceState::new(1, 5), true).unwrap();
        assert_eq!(dist.len(), 1);
        assert_eq!(dist.value(&ForceState::new(1, 5)), 1.0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = seeded(800, 9).simulate(ForceState::new(10, 10), true).unwrap();
        let b = seeded(800, 9).simulate(ForceState::new(10, 10), true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = SimulationConfig::default().with_runs(600).with_seed(3);
        let sequential = Simulator::from_config(&SimulationConfig {
            parallel_threshold: u32::MAX,
            ..config.clone()
        })
        .unwrap();
        let parallel = Simulator::from_config(&SimulationConfig {
            parallel_threshold: 1,
            ..config
        })
        .unwrap();

        let initial = ForceState::new(12, 7);
        assert_eq!(
            sequential.simulate(initial, true).unwrap(),
            parallel.simulate(initial, true).unwrap()
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        let sim = seeded(10, 1);
        assert!(matches!(
            sim.simulate(ForceState::new(0, 3), true),
            Err(RiskError::InvalidForce { attackers: 0, defenders: 3 })
        ));
        assert!(matches!(
            sim.simulate(ForceState::new(3, 0), true),
            Err(RiskError::InvalidForce { .. })
        ));
        assert!(matches!(simulate(ForceState::new(5, 5), 0, true), Err(RiskError::ZeroRuns)));
    }

    #[test]
    fn test_sorted_counts() {
        let dist = seeded(300, 5).simulate(ForceState::new(5, 3), false).unwrap();
        let entries = dist.sorted_counts();
        assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(entries.iter().map(|(_, c)| c).sum::<u32>(), 300);
    }

    #[test]
    fn test_mix_seed_spreads_streams() {
        assert_ne!(mix_seed(1, 0), mix_seed(1, 1));
        assert_ne!(mix_seed(1, 0), mix_seed(2, 0));
        assert_eq!(mix_seed(17, 4), mix_seed(17, 4));
    }
}
