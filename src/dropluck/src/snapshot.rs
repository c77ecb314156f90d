//! Collection snapshots
//!
//! A snapshot is what the collection log exporter hands over: the player's
//! kill counts and the items they have collected so far.

use crate::attempts::KillCountTable;
use crate::types::ObservedItem;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One named kill count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillCountEntry {
    pub name: String,
    pub count: u64,
}

/// Kill counts and observed items at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    #[serde(default)]
    pub kill_counts: Vec<KillCountEntry>,
    #[serde(default)]
    pub items: Vec<ObservedItem>,
}

impl CollectionSnapshot {
    /// Load a snapshot from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Kill counts keyed by name, summing repeated names
    pub fn kill_count_table(&self) -> KillCountTable {
        self.kill_counts
            .iter()
            .map(|entry| (entry.name.as_str(), entry.count))
            .collect()
    }

    /// Find an observed item by case-insensitive name
    pub fn item(&self, name: &str) -> Option<&ObservedItem> {
        self.items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }
}
