//! Drop models
//!
//! A drop owns the rolls that can produce it and the per-player options it
//! depends on. The kind decides how the success count turns into the
//! observed quantity:
//!
//! - `Binomial`: every success is one item
//! - `GuaranteedOnce`: like `Binomial`, but one item is guaranteed once
//!   enough attempts have been made
//! - `UniformSum`: every success yields a uniformly random stack size

mod binomial;
mod uniform_sum;

pub use binomial::{binomial_tails, guaranteed_once_tails};
pub use uniform_sum::{
    exact_uniform_sum_tails, normal_uniform_sum_tails, uniform_sum_regime, uniform_sum_tails,
    Regime, EXACT_REGIME_MAX_CELLS, EXACT_REGIME_MAX_EXPECTED_SUCCESSES,
};

use crate::attempts::{self, Attempts, KillCountTable};
use crate::catalog::CatalogError;
use crate::config::{self, ConfigAdjustment, PlayerConfig};
use crate::roll::RollSpec;
use crate::stats::Tails;
use crate::types::LuckResult;
use serde::{Deserialize, Serialize};

/// How successes become observed quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropKind {
    Binomial,
    GuaranteedOnce { guaranteed_on_attempts: u64 },
    UniformSum { min_roll: u64, max_roll: u64 },
}

impl std::fmt::Display for DropKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binomial => write!(f, "binomial"),
            Self::GuaranteedOnce {
                guaranteed_on_attempts,
            } => write!(f, "binomial, guaranteed at {}", guaranteed_on_attempts),
            Self::UniformSum { min_roll, max_roll } => {
                write!(f, "binomial x uniform {}-{}", min_roll, max_roll)
            }
        }
    }
}

/// Serialized form of a drop, validated on the way in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropDefinition {
    #[serde(flatten)]
    pub kind: DropKind,
    pub rolls: Vec<RollSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<ConfigAdjustment>,
}

/// An immutable, validated drop definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DropDefinition", into = "DropDefinition")]
pub struct Drop {
    kind: DropKind,
    rolls: Vec<RollSpec>,
    adjustments: Vec<ConfigAdjustment>,
}

impl TryFrom<DropDefinition> for Drop {
    type Error = CatalogError;

    fn try_from(definition: DropDefinition) -> Result<Self, Self::Error> {
        if definition.rolls.is_empty() {
            return Err(CatalogError::NoRolls);
        }
        for roll in &definition.rolls {
            roll.validate()?;
        }
        match definition.kind {
            DropKind::UniformSum { min_roll, max_roll } if min_roll > max_roll => {
                return Err(CatalogError::InvalidRollRange { min_roll, max_roll });
            }
            DropKind::UniformSum { min_roll, max_roll }
                if (max_roll - min_roll).checked_add(1).is_none() =>
            {
                return Err(CatalogError::RollRangeTooWide { min_roll, max_roll });
            }
            DropKind::GuaranteedOnce {
                guaranteed_on_attempts: 0,
            } => return Err(CatalogError::InvalidGuarantee),
            _ => {}
        }

        Ok(Self {
            kind: definition.kind,
            rolls: definition.rolls,
            adjustments: definition.adjustments,
        })
    }
}

impl From<Drop> for DropDefinition {
    fn from(drop: Drop) -> Self {
        Self {
            kind: drop.kind,
            rolls: drop.rolls,
            adjustments: drop.adjustments,
        }
    }
}

impl Drop {
    /// Start a plain binomial drop
    pub fn binomial() -> DropBuilder {
        DropBuilder::new(DropKind::Binomial)
    }

    /// Start a drop that is guaranteed once `guaranteed_on_attempts` is reached
    pub fn guaranteed_once(guaranteed_on_attempts: u64) -> DropBuilder {
        DropBuilder::new(DropKind::GuaranteedOnce {
            guaranteed_on_attempts,
        })
    }

    /// Start a drop whose successes each yield `min_roll..=max_roll` items
    pub fn uniform_sum(min_roll: u64, max_roll: u64) -> DropBuilder {
        DropBuilder::new(DropKind::UniformSum { min_roll, max_roll })
    }

    pub fn kind(&self) -> DropKind {
        self.kind
    }

    pub fn rolls(&self) -> &[RollSpec] {
        &self.rolls
    }

    pub fn adjustments(&self) -> &[ConfigAdjustment] {
        &self.adjustments
    }

    /// Why luck cannot be calculated for this drop, if it cannot
    pub fn incalculable_reason(&self, config: Option<&dyn PlayerConfig>) -> Option<String> {
        config::incalculable_reason(&self.adjustments, config)
    }

    /// Attempts after kill counts and attempt-subtract options
    pub fn resolve_attempts(
        &self,
        kill_counts: &KillCountTable,
        config: Option<&dyn PlayerConfig>,
    ) -> Attempts {
        attempts::aggregate(&self.rolls, kill_counts, &self.adjustments, config)
    }

    /// Observed quantity after observed-subtract options
    pub fn resolve_observed(&self, quantity: u64, config: Option<&dyn PlayerConfig>) -> u64 {
        attempts::resolve_observed(quantity, &self.adjustments, config)
    }

    /// Mass of the modelled quantity below, at and above `observed`
    pub fn tails(&self, attempts: &Attempts, observed: u64) -> Tails {
        match self.kind {
            DropKind::Binomial => binomial_tails(attempts, observed),
            DropKind::GuaranteedOnce {
                guaranteed_on_attempts,
            } => guaranteed_once_tails(attempts, guaranteed_on_attempts, observed),
            DropKind::UniformSum { min_roll, max_roll } => {
                uniform_sum_tails(attempts, min_roll, max_roll, observed)
            }
        }
    }

    /// Luck and dryness for `quantity` items given the kill counts
    ///
    /// Does not check calculability; see [`Drop::incalculable_reason`].
    pub fn luck_dryness(
        &self,
        kill_counts: &KillCountTable,
        config: Option<&dyn PlayerConfig>,
        quantity: u64,
    ) -> LuckResult {
        let attempts = self.resolve_attempts(kill_counts, config);
        let observed = self.resolve_observed(quantity, config);
        let tails = self.tails(&attempts, observed);
        LuckResult::new(tails.below, tails.above)
    }

    /// P(X < observed)
    pub fn calculate_luck(
        &self,
        kill_counts: &KillCountTable,
        config: Option<&dyn PlayerConfig>,
        quantity: u64,
    ) -> f64 {
        self.luck_dryness(kill_counts, config, quantity).luck
    }

    /// P(X > observed)
    pub fn calculate_dryness(
        &self,
        kill_counts: &KillCountTable,
        config: Option<&dyn PlayerConfig>,
        quantity: u64,
    ) -> f64 {
        self.luck_dryness(kill_counts, config, quantity).dryness
    }
}

/// Builds a [`Drop`]; each call consumes the builder and returns it
#[derive(Debug, Clone)]
pub struct DropBuilder {
    definition: DropDefinition,
}

impl DropBuilder {
    pub fn new(kind: DropKind) -> Self {
        Self {
            definition: DropDefinition {
                kind,
                rolls: Vec::new(),
                adjustments: Vec::new(),
            },
        }
    }

    /// One roll per kill of `source`
    pub fn roll(self, source: impl Into<String>, drop_chance: f64) -> Self {
        self.with_roll(RollSpec::new(source, drop_chance))
    }

    pub fn with_roll(mut self, roll: RollSpec) -> Self {
        self.definition.rolls.push(roll);
        self
    }

    pub fn with_adjustment(mut self, adjustment: ConfigAdjustment) -> Self {
        self.definition.adjustments.push(adjustment);
        self
    }

    pub fn build(self) -> Result<Drop, CatalogError> {
        Drop::try_from(self.definition)
    }
}
