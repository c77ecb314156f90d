//! Roll specifications
//!
//! A roll is one independent chance at a drop. Each kill-count unit of a
//! source grants `attempts_per_unit` rolls at `drop_chance`.

use crate::catalog::CatalogError;
use serde::{Deserialize, Serialize};

/// One source of rolls for a drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollSpec {
    /// Kill-count name the rolls come from (e.g. "Vorkath", "Chambers of Xeric")
    pub source: String,
    /// Per-roll success probability, in (0, 1]
    pub drop_chance: f64,
    /// Rolls granted per kill-count unit
    #[serde(default = "default_attempts_per_unit")]
    pub attempts_per_unit: u64,
}

fn default_attempts_per_unit() -> u64 {
    1
}

impl RollSpec {
    /// One roll per kill at `drop_chance`
    pub fn new(source: impl Into<String>, drop_chance: f64) -> Self {
        Self {
            source: source.into(),
            drop_chance,
            attempts_per_unit: 1,
        }
    }

    /// Several rolls per kill at `drop_chance`
    pub fn with_attempts_per_unit(mut self, attempts_per_unit: u64) -> Self {
        self.attempts_per_unit = attempts_per_unit;
        self
    }

    /// Check the invariants a roll must satisfy before it can be evaluated
    pub fn validate(&self) -> Result<(), CatalogError> {
        // Written so NaN fails too
        if !(self.drop_chance > 0.0 && self.drop_chance <= 1.0) {
            return Err(CatalogError::InvalidDropChance {
                source_name: self.source.clone(),
                chance: self.drop_chance,
            });
        }
        if self.attempts_per_unit == 0 {
            return Err(CatalogError::InvalidAttemptsPerUnit {
                source_name: self.source.clone(),
            });
        }
        Ok(())
    }
}
