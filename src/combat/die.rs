//! Dice with arbitrary face values

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::constants::STANDARD_DIE;
use crate::core::error::{Result, RiskError};

/// A die with a non-empty ordered set of faces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    faces: Vec<u32>,
}

impl Default for Die {
    fn default() -> Self {
        Self::standard()
    }
}

impl Die {
    /// Build a die from its faces; an empty face set is rejected
    pub fn new(faces: Vec<u32>) -> Result<Self> {
        if faces.is_empty() {
            return Err(RiskError::EmptyDie);
        }
        Ok(Self { faces })
    }

    /// Six-sided die with faces 1..=6
    pub fn standard() -> Self {
        Self {
            faces: STANDARD_DIE.to_vec(),
        }
    }

    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    /// Draw one face uniformly at random
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.faces[rng.gen_range(0..self.faces.len())]
    }

    /// Roll `n` dice independently, with replacement
    pub fn roll_many<R: Rng + ?Sized>(&self, n: u32, rng: &mut R) -> Vec<u32> {
        (0..n).map(|_| self.roll(rng)).collect()
    }
}
