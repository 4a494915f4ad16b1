//! Campaign resolution
//!
//! A campaign applies combat rounds to a force state until the attacker has
//! taken the territory or can no longer field an attacking die. Each round
//! consumes one state and produces the next; nothing is mutated in place.

use rand::Rng;

use crate::combat::{resolve_round, Die};
use crate::core::error::{Result, RiskError};
use crate::core::types::{ForceState, RoundLosses};

/// Attacker count at or below which the attack must stop
pub const ATTACKER_STOP_THRESHOLD: u32 = 1;

/// Has this campaign ended?
///
/// Checked before every round, including the first.
pub fn is_terminal(state: &ForceState) -> bool {
    state.defenders == 0 || state.attackers <= ATTACKER_STOP_THRESHOLD
}

/// Subtract round losses from a state
///
/// Losses larger than the surviving force indicate a broken combat rule and
/// are reported as an invariant violation, never clamped.
pub fn apply_losses(state: ForceState, losses: RoundLosses) -> Result<ForceState> {
    let attackers = state.attackers.checked_sub(losses.attackers);
    let defenders = state.defenders.checked_sub(losses.defenders);

    match (attackers, defenders) {
        (Some(attackers), Some(defenders)) => Ok(ForceState::new(attackers, defenders)),
        _ => Err(RiskError::InvariantViolation { state, losses }),
    }
}

/// Fight one round from `state`
pub fn advance<R: Rng + ?Sized>(state: ForceState, die: &Die, rng: &mut R) -> Result<ForceState> {
    let losses = resolve_round(&state, die, rng);
    apply_losses(state, losses)
}

/// Fight rounds until the campaign reaches a terminal state
///
/// A state that is already terminal is returned unchanged without rolling.
/// Termination: while both sides roll, every round removes at least one
/// unit, and a side that cannot roll is already terminal.
pub fn run_campaign<R: Rng + ?Sized>(initial: ForceState, die: &Die, rng: &mut R) -> Result<ForceState> {
    let mut state = initial;
    while !is_terminal(&state) {
        state = advance(state, die, rng)?;
    }
    Ok(state)
}
