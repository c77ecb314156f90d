//! Per-player configuration and the adjustments drops attach to it
//!
//! Some drops depend on facts only the player knows: items bought instead
//! of dropped, rolls spent elsewhere, or whether a mechanic should be
//! modelled at all. Those facts come from a [`PlayerConfig`]. A missing
//! config means the log being viewed is not the player's own.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Value of a per-player option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
}

impl OptionValue {
    /// Integer view of the option (booleans read as 0 / 1)
    pub fn as_int(&self) -> i64 {
        match self {
            Self::Int(v) => *v,
            Self::Bool(b) => i64::from(*b),
        }
    }

    /// Boolean view of the option (integers are true when non-zero)
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(v) => *v != 0,
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(v) => write!(f, "{}", v),
        }
    }
}

impl std::str::FromStr for OptionValue {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Ok(Self::Bool(true)),
            "false" | "no" | "off" => Ok(Self::Bool(false)),
            other => other.parse().map(Self::Int),
        }
    }
}

/// Read access to the viewing player's options
pub trait PlayerConfig: Sync {
    /// Look up an option by key
    fn option(&self, key: &str) -> Option<OptionValue>;

    /// Integer option, 0 when unset
    fn int_option(&self, key: &str) -> i64 {
        self.option(key).map(|v| v.as_int()).unwrap_or(0)
    }

    /// Boolean option, false when unset
    fn bool_option(&self, key: &str) -> bool {
        self.option(key).map(|v| v.as_bool()).unwrap_or(false)
    }
}

impl PlayerConfig for HashMap<String, OptionValue> {
    fn option(&self, key: &str) -> Option<OptionValue> {
        self.get(key).copied()
    }
}

impl PlayerConfig for BTreeMap<String, OptionValue> {
    fn option(&self, key: &str) -> Option<OptionValue> {
        self.get(key).copied()
    }
}

/// What an adjustment does with its option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentRole {
    /// Integer option subtracted from the drop's total attempts
    AttemptSubtract,
    /// Integer option subtracted from the observed quantity
    ObservedSubtract,
    /// Boolean option that must be enabled for the drop to be modelled
    FeatureGate,
}

impl std::fmt::Display for AdjustmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AttemptSubtract => write!(f, "attempt subtract"),
            Self::ObservedSubtract => write!(f, "observed subtract"),
            Self::FeatureGate => write!(f, "feature gate"),
        }
    }
}

/// A per-player option a drop depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigAdjustment {
    /// Option key
    pub key: String,
    pub role: AdjustmentRole,
    /// Human-readable name of the mechanic, used in reasons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ConfigAdjustment {
    pub fn new(key: impl Into<String>, role: AdjustmentRole) -> Self {
        Self {
            key: key.into(),
            role,
            label: None,
        }
    }

    pub fn attempt_subtract(key: impl Into<String>) -> Self {
        Self::new(key, AdjustmentRole::AttemptSubtract)
    }

    pub fn observed_subtract(key: impl Into<String>) -> Self {
        Self::new(key, AdjustmentRole::ObservedSubtract)
    }

    pub fn feature_gate(key: impl Into<String>) -> Self {
        Self::new(key, AdjustmentRole::FeatureGate)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Name used when explaining why a drop is incalculable
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// Non-negative integer value of this option, 0 without a config
    pub fn amount(&self, config: Option<&dyn PlayerConfig>) -> u64 {
        config
            .map(|c| c.int_option(&self.key).max(0) as u64)
            .unwrap_or(0)
    }

    /// Reason this adjustment blocks calculation, if any
    pub fn blocking_reason(&self, config: Option<&dyn PlayerConfig>) -> Option<String> {
        let Some(config) = config else {
            return Some(format!(
                "{} is only available for your own character",
                self.display_name()
            ));
        };

        match self.role {
            AdjustmentRole::FeatureGate if !config.bool_option(&self.key) => Some(format!(
                "Luck calculation for {} is disabled in the configuration ({})",
                self.display_name(),
                self.key
            )),
            _ => None,
        }
    }
}

/// First reason any adjustment blocks calculation, in attachment order
pub fn incalculable_reason(
    adjustments: &[ConfigAdjustment],
    config: Option<&dyn PlayerConfig>,
) -> Option<String> {
    adjustments
        .iter()
        .find_map(|adjustment| adjustment.blocking_reason(config))
}

/// Total of all options with the given role
pub fn total_for_role(
    adjustments: &[ConfigAdjustment],
    role: AdjustmentRole,
    config: Option<&dyn PlayerConfig>,
) -> u64 {
    adjustments
        .iter()
        .filter(|a| a.role == role)
        .map(|a| a.amount(config))
        .fold(0u64, u64::saturating_add)
}
