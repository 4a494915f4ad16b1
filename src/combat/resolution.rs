//! Single-round dice resolution
//!
//! Both sides roll, dice are sorted high to low and compared pairwise.
//! Ties go to the defender. Unpaired dice are discarded.

use rand::Rng;

use crate::combat::constants::{ATTACKER_GARRISON, ATTACKER_MAX_DICE, DEFENDER_MAX_DICE};
use crate::combat::die::Die;
use crate::core::types::{ForceState, RoundLosses};

/// Dice rolled this round as (attacker, defender)
///
/// Either count may be zero, in which case that side rolls nothing.
pub fn dice_counts(state: &ForceState) -> (u32, u32) {
    let attacker = state
        .attackers
        .saturating_sub(ATTACKER_GARRISON)
        .min(ATTACKER_MAX_DICE);
    let defender = state.defenders.min(DEFENDER_MAX_DICE);
    (attacker, defender)
}

/// Compare two sets of rolls and count the losses on each side
pub fn compare_rolls(mut attacker_rolls: Vec<u32>, mut defender_rolls: Vec<u32>) -> RoundLosses {
    attacker_rolls.sort_unstable_by(|a, b| b.cmp(a));
    defender_rolls.sort_unstable_by(|a, b| b.cmp(a));

    attacker_rolls
        .iter()
        .zip(defender_rolls.iter())
        .fold(RoundLosses::default(), |mut losses, (a, d)| {
            if a > d {
                losses.defenders += 1;
            } else {
                losses.attackers += 1;
            }
            losses
        })
}

/// Roll one round of combat for `state` and return the losses
pub fn resolve_round<R: Rng + ?Sized>(state: &ForceState, die: &Die, rng: &mut R) -> RoundLosses {
    let (attacker_dice, defender_dice) = dice_counts(state);
    let attacker_rolls = die.roll_many(attacker_dice, rng);
    let defender_rolls = die.roll_many(defender_dice, rng);
    compare_rolls(attacker_rolls, defender_rolls)
}
