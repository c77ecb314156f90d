//! Inputs and outputs of a luck evaluation

use serde::{Deserialize, Serialize};

/// An item as recorded in the player's collection log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedItem {
    /// Game item id
    pub id: i32,
    /// Display name
    pub name: String,
    /// Number of times the item has been obtained
    #[serde(default)]
    pub quantity: u64,
    /// Whether the collection log slot is filled
    #[serde(default)]
    pub obtained: bool,
    /// Position of the item in its collection log page
    #[serde(default)]
    pub sequence: u32,
}

impl ObservedItem {
    pub fn new(id: i32, name: impl Into<String>, quantity: u64) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            obtained: quantity > 0,
            sequence: 0,
        }
    }
}

/// Luck and dryness of an observed quantity
///
/// `luck` is the chance a random player would have fewer, `dryness` the
/// chance they would have more. The two never sum past 1; the gap is the
/// chance of matching the observation exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LuckResult {
    pub luck: f64,
    pub dryness: f64,
}

impl LuckResult {
    pub fn new(luck: f64, dryness: f64) -> Self {
        Self { luck, dryness }
    }

    /// Both values are real numbers
    pub fn is_finite(&self) -> bool {
        self.luck.is_finite() && self.dryness.is_finite()
    }

    /// Chance of exactly matching the observed quantity
    pub fn exact(&self) -> f64 {
        (1.0 - self.luck - self.dryness).max(0.0)
    }
}

impl std::fmt::Display for LuckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "luck {:.2}%, dryness {:.2}%",
            self.luck * 100.0,
            self.dryness * 100.0
        )
    }
}

/// Outcome of evaluating one item: a result, or why there is none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    Computed(LuckResult),
    Incalculable(String),
}

impl Evaluation {
    pub fn result(&self) -> Option<LuckResult> {
        match self {
            Self::Computed(result) => Some(*result),
            Self::Incalculable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Computed(_) => None,
            Self::Incalculable(reason) => Some(reason),
        }
    }
}
