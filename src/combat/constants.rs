//! Dice combat constants - all rule values in one place

/// Most dice the attacker may roll in one round
pub const ATTACKER_MAX_DICE: u32 = 3;

/// Most dice the defender may roll in one round
pub const DEFENDER_MAX_DICE: u32 = 2;

/// Units the attacker must leave behind (never risked in a roll)
pub const ATTACKER_GARRISON: u32 = 1;

/// Standard six-sided die
pub const STANDARD_DIE: [u32; 6] = [1, 2, 3, 4, 5, 6];
