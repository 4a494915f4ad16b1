//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::RiskError;

/// Unit counts of both sides of a campaign
///
/// A new value is produced on every round; states are compared and hashed by
/// value so terminal outcomes can be tallied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForceState {
    pub attackers: u32,
    pub defenders: u32,
}

impl ForceState {
    pub fn new(attackers: u32, defenders: u32) -> Self {
        Self {
            attackers,
            defenders,
        }
    }

    /// Attacker has taken the territory
    pub fn attacker_won(&self) -> bool {
        self.defenders == 0
    }

    /// Defender win set as reported by the estimator
    ///
    /// Literal `attackers <= defenders`. On reachable terminal states this
    /// agrees with `defenders > 0`.
    pub fn defender_won(&self) -> bool {
        self.attackers <= self.defenders
    }

    pub fn is_won_by(&self, party: Party) -> bool {
        match party {
            Party::Attacker => self.attacker_won(),
            Party::Defender => self.defender_won(),
        }
    }
}

impl fmt::Display for ForceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State(A={}, D={})", self.attackers, self.defenders)
    }
}

/// Units lost by each side in one round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundLosses {
    pub attackers: u32,
    pub defenders: u32,
}

impl RoundLosses {
    pub fn new(attackers: u32, defenders: u32) -> Self {
        Self {
            attackers,
            defenders,
        }
    }

    pub fn total(&self) -> u32 {
        self.attackers + self.defenders
    }
}

/// One of the two sides of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Attacker,
    Defender,
}

impl Party {
    pub fn name(&self) -> &'static str {
        match self {
            Party::Attacker => "attacker",
            Party::Defender => "defender",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Party {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attacker" => Ok(Party::Attacker),
            "defender" => Ok(Party::Defender),
            _ => Err(RiskError::UnknownParty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_parsing() {
        assert_eq!("attacker".parse::<Party>().unwrap(), Party::Attacker);
        assert_eq!(" Defender ".parse::<Party>().unwrap(), Party::Defender);
        assert!(matches!(
            "spectator".parse::<Party>(),
            Err(RiskError::UnknownParty(name)) if name == "spectator"
        ));
    }

    #[test]
    fn test_force_state_value_equality() {
        let a = ForceState::new(3, 0);
        let b = ForceState::new(3, 0);
        assert_eq!(a, b);

        let mut tally = ahash::AHashMap::new();
        *tally.entry(a).or_insert(0u32) += 1;
        *tally.entry(b).or_insert(0u32) += 1;
        assert_eq!(tally[&ForceState::new(3, 0)], 2);
    }

    #[test]
    fn test_win_predicates() {
        assert!(ForceState::new(4, 0).attacker_won());
        assert!(!ForceState::new(4, 0).defender_won());
        assert!(ForceState::new(1, 3).defender_won());
        assert!(!ForceState::new(1, 3).attacker_won());
        // Literal predicate: equal counts go to the defender
        assert!(ForceState::new(1, 1).defender_won());
    }

    #[test]
    fn test_display() {
        assert_eq!(ForceState::new(8, 4).to_string(), "State(A=8, D=4)");
        assert_eq!(Party::Defender.to_string(), "defender");
    }
}
