//! End-to-end tests for sampling, estimation and sweeps
//!
//! Scenario tests pin concrete starting states; the proptest blocks check the
//! invariants that must hold for any starting state and seed.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use risk_mc::campaign::{advance, is_terminal, run_campaign};
use risk_mc::combat::Die;
use risk_mc::core::config::SimulationConfig;
use risk_mc::core::types::{ForceState, Party};
use risk_mc::simulation::{
    marginal_gain, sweep_defense_with, win_probability, DefenseImprovement, OutcomeDistribution,
    Simulator,
};

fn seeded_simulator(runs: u32, seed: u64) -> Simulator {
    Simulator::from_config(&SimulationConfig::default().with_runs(runs).with_seed(seed)).unwrap()
}

fn sample(attackers: u32, defenders: u32, runs: u32, seed: u64) -> OutcomeDistribution {
    seeded_simulator(runs, seed)
        .simulate(ForceState::new(attackers, defenders), true)
        .unwrap()
}

/// Two attackers against one defender: exactly one die each, one comparison
#[test]
fn test_two_vs_one_resolves_in_one_round() {
    for seed in 0..50 {
        let dist = sample(2, 1, 1, seed);
        assert_eq!(dist.len(), 1);

        let terminal = *dist.states().next().unwrap();
        assert!(
            terminal == ForceState::new(1, 1) || terminal == ForceState::new(2, 0),
            "unexpected terminal state {}",
            terminal
        );
    }
}

/// A single attacker cannot attack; the start state is the only outcome
#[test]
fn test_lone_attacker_is_already_terminal() {
    let dist = sample(1, 5, 1000, 42);
    assert_eq!(dist.len(), 1);
    assert_eq!(dist.value(&ForceState::new(1, 5)), 1.0);

    let defender = win_probability(&dist, Party::Defender);
    assert_eq!(defender.p_win, 1.0);
}

#[test]
fn test_identical_seeded_calls_match() {
    let a = sample(8, 4, 1000, 2024);
    let b = sample(8, 4, 1000, 2024);
    assert_eq!(a, b);
    assert_eq!(
        win_probability(&a, Party::Attacker),
        win_probability(&b, Party::Attacker)
    );
}

/// Two independent defense sweeps agree within their combined 3 sigma bands
#[test]
fn test_defense_sweep_is_stable_across_independent_runs() {
    let first = sweep_defense_with(
        &SimulationConfig::default().with_runs(5000).with_seed(1),
        1,
        10,
        3,
    )
    .unwrap();
    let second = sweep_defense_with(
        &SimulationConfig::default().with_runs(5000).with_seed(2),
        1,
        10,
        3,
    )
    .unwrap();

    assert_eq!(first.len(), 3);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.defenders, b.defenders);
        let half_widths = (a.p_win_high - a.p_win_low) / 2.0 + (b.p_win_high - b.p_win_low) / 2.0;
        // 0.002 covers rounding to three places on both sides
        assert!(
            (a.p_win - b.p_win).abs() <= half_widths + 0.002,
            "{} defenders: {:.3} vs {:.3}",
            a.defenders,
            a.p_win,
            b.p_win
        );
    }
}

#[test]
fn test_defense_grows_with_defenders() {
    let records =
        sweep_defense_with(&SimulationConfig::default().with_runs(3000).with_seed(11), 2, 8, 12)
            .unwrap();
    let first = records.first().unwrap();
    let last = records.last().unwrap();
    // 8 attackers vs 2 defenders is an easy win; vs 12 it is hopeless
    assert!(last.p_win > first.p_win + 0.5);
}

#[test]
fn test_marginal_gain_scenario() {
    let records: Vec<DefenseImprovement> = [0.10, 0.25, 0.30]
        .iter()
        .enumerate()
        .map(|(i, &p)| DefenseImprovement {
            defenders: 5 + i as u32,
            p_win: p,
            p_win_low: p,
            p_win_high: p,
        })
        .collect();

    let gain = marginal_gain(&records);
    assert_eq!(gain.best_additional_units, Some(1));
    assert!(gain.gains[0].is_none());
    assert!((gain.gains[1].unwrap() - 0.15).abs() < 1e-9);
    assert!((gain.gains[2].unwrap() - 0.05).abs() < 1e-9);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_terminal_states_unchanged(
        attackers in 0u32..=1,
        defenders in 0u32..40,
        other in 0u32..40,
        seed in any::<u64>(),
    ) {
        let die = Die::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let stopped = ForceState::new(attackers, defenders);
        prop_assert_eq!(run_campaign(stopped, &die, &mut rng).unwrap(), stopped);

        let conquered = ForceState::new(other, 0);
        prop_assert_eq!(run_campaign(conquered, &die, &mut rng).unwrap(), conquered);
    }

    #[test]
    fn prop_one_round_never_grows_or_goes_negative(
        attackers in 2u32..80,
        defenders in 1u32..80,
        seed in any::<u64>(),
    ) {
        let state = ForceState::new(attackers, defenders);
        prop_assume!(!is_terminal(&state));

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let next = advance(state, &Die::standard(), &mut rng).unwrap();

        prop_assert!(next.attackers <= state.attackers);
        prop_assert!(next.defenders <= state.defenders);
        prop_assert!(next.attackers >= 1);
        prop_assert!(next.attackers + next.defenders < state.attackers + state.defenders);
    }

    #[test]
    fn prop_normalized_distribution_sums_to_one(
        attackers in 1u32..25,
        defenders in 1u32..25,
        runs in 1u32..300,
        seed in any::<u64>(),
    ) {
        let dist = sample(attackers, defenders, runs, seed);
        prop_assert!((dist.total_probability() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn prop_estimate_bounds_are_ordered(
        attackers in 1u32..25,
        defenders in 1u32..25,
        runs in 1u32..300,
        seed in any::<u64>(),
    ) {
        let dist = sample(attackers, defenders, runs, seed);
        for party in [Party::Attacker, Party::Defender] {
            let p = win_probability(&dist, party);
            prop_assert!(p.p_win_low <= p.p_win);
            prop_assert!(p.p_win <= p.p_win_high);
            prop_assert!(p.p_win_low >= 0.0 && p.p_win_high <= 1.0);
        }
    }

    /// The literal defender predicate (attackers <= defenders) and
    /// "defenders remain" agree on every reachable terminal state
    #[test]
    fn prop_defender_predicates_agree_on_terminal_states(
        attackers in 1u32..30,
        defenders in 1u32..30,
        seed in any::<u64>(),
    ) {
        let dist = sample(attackers, defenders, 200, seed);
        for state in dist.states() {
            prop_assert!(is_terminal(state));
            prop_assert_eq!(state.defender_won(), state.defenders > 0);
            prop_assert_ne!(state.defender_won(), state.attacker_won());
        }
    }
}
