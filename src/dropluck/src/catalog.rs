//! Drop catalog
//!
//! Maps item identity to its drop definition. The catalog is built once,
//! validated as a whole, and read-only afterwards.

use crate::drops::Drop;
use crate::types::ObservedItem;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Current catalog manifest format version
pub const CATALOG_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Drop chance for '{source_name}' must be in (0, 1], got {chance}")]
    InvalidDropChance { source_name: String, chance: f64 },

    #[error("Attempts per unit for '{source_name}' must be at least 1")]
    InvalidAttemptsPerUnit { source_name: String },

    #[error("Invalid roll range: min roll {min_roll} is greater than max roll {max_roll}")]
    InvalidRollRange { min_roll: u64, max_roll: u64 },

    #[error("Roll range {min_roll}..={max_roll} has more values than fit in a u64")]
    RollRangeTooWide { min_roll: u64, max_roll: u64 },

    #[error("Guaranteed drop must require at least one attempt")]
    InvalidGuarantee,

    #[error("Drop has no rolls")]
    NoRolls,

    #[error("Unsupported catalog version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Item {id} ('{name}') is defined more than once")]
    DuplicateItem { id: i32, name: String },

    #[error("No drop defined for item {id} ('{name}')")]
    UnknownItem { id: i32, name: String },
}

/// One catalog row: an item and how it drops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_id: i32,
    pub item_name: String,
    pub drop: Drop,
}

/// On-disk catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub version: u32,
    pub drops: Vec<CatalogEntry>,
}

/// Read-only lookup of drop definitions by item
#[derive(Debug, Clone, Default)]
pub struct DropCatalog {
    entries: Vec<CatalogEntry>,
    /// Index: item id → entry
    by_id: HashMap<i32, usize>,
    /// Index: lowercase item name → entry
    by_name: HashMap<String, usize>,
}

impl DropCatalog {
    /// Load a catalog from a manifest file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let manifest: CatalogManifest = serde_json::from_str(&content)?;
        Self::from_manifest(manifest)
    }

    /// Create from an already-parsed manifest
    pub fn from_manifest(manifest: CatalogManifest) -> Result<Self, CatalogError> {
        if manifest.version != CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                found: manifest.version,
                expected: CATALOG_VERSION,
            });
        }
        Self::from_entries(manifest.drops)
    }

    /// Create from entries, rejecting duplicate items
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();

        for (i, entry) in entries.iter().enumerate() {
            let duplicate = by_id.insert(entry.item_id, i).is_some()
                | by_name.insert(entry.item_name.to_lowercase(), i).is_some();
            if duplicate {
                return Err(CatalogError::DuplicateItem {
                    id: entry.item_id,
                    name: entry.item_name.clone(),
                });
            }
        }

        Ok(Self {
            entries,
            by_id,
            by_name,
        })
    }

    /// Serialize back to the manifest format
    pub fn to_manifest(&self) -> CatalogManifest {
        CatalogManifest {
            version: CATALOG_VERSION,
            drops: self.entries.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get_by_id(&self, id: i32) -> Option<&CatalogEntry> {
        self.by_id.get(&id).map(|&i| &self.entries[i])
    }

    /// Case-insensitive exact name lookup
    pub fn get_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.entries[i])
    }

    /// Drop bound to an observed item, by id first and then by name
    pub fn resolve(&self, item: &ObservedItem) -> Result<&Drop, CatalogError> {
        self.get_by_id(item.id)
            .or_else(|| self.get_by_name(&item.name))
            .map(|entry| &entry.drop)
            .ok_or_else(|| CatalogError::UnknownItem {
                id: item.id,
                name: item.name.clone(),
            })
    }

    /// Find entries by name: exact match first, then partial matches
    ///
    /// Partial matches are sorted by item name.
    pub fn find(&self, query: &str) -> Vec<&CatalogEntry> {
        if let Some(entry) = self.get_by_name(query) {
            return vec![entry];
        }

        let query_lower = query.to_lowercase();
        let mut matches: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|e| e.item_name.to_lowercase().contains(&query_lower))
            .collect();
        matches.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        matches
    }

    /// All kill-count sources referenced by any drop, sorted
    pub fn all_sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self
            .entries
            .iter()
            .flat_map(|e| e.drop.rolls().iter().map(|r| r.source.as_str()))
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        sources.sort();
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigAdjustment;
    use std::io::Write;

    fn test_entries() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry {
                item_id: 12936,
                item_name: "Jar of swamp".to_string(),
                drop: Drop::binomial().roll("Zulrah", 1.0 / 3000.0).build().unwrap(),
            },
            CatalogEntry {
                item_id: 12922,
                item_name: "Tanzanite fang".to_string(),
                drop: Drop::binomial().roll("Zulrah", 1.0 / 512.0).build().unwrap(),
            },
            CatalogEntry {
                item_id: 11286,
                item_name: "Draconic visage".to_string(),
                drop: Drop::binomial()
                    .roll("Vorkath", 1.0 / 5000.0)
                    .with_adjustment(ConfigAdjustment::observed_subtract("visages_bought"))
                    .build()
                    .unwrap(),
            },
        ]
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let catalog = DropCatalog::from_entries(test_entries()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.get_by_id(12922).map(|e| e.item_name.as_str()),
            Some("Tanzanite fang")
        );
        assert_eq!(
            catalog.get_by_name("DRACONIC VISAGE").map(|e| e.item_id),
            Some(11286)
        );
    }

    #[test]
    fn test_resolve_falls_back_to_name() {
        let catalog = DropCatalog::from_entries(test_entries()).unwrap();
        let item = ObservedItem::new(-1, "jar of swamp", 1);
        assert!(catalog.resolve(&item).is_ok());

        let unknown = ObservedItem::new(-1, "Pet rock", 1);
        assert!(matches!(
            catalog.resolve(&unknown),
            Err(CatalogError::UnknownItem { .. })
        ));
    }

    #[test]
    fn test_find_partial() {
        let catalog = DropCatalog::from_entries(test_entries()).unwrap();
        let results = catalog.find("o");
        let names: Vec<&str> = results.iter().map(|e| e.item_name.as_str()).collect();
        assert_eq!(names, vec!["Draconic visage", "Jar of swamp"]);

        assert_eq!(catalog.find("tanzanite fang").len(), 1);
        assert!(catalog.find("twisted bow").is_empty());
    }

    #[test]
    fn test_all_sources_deduplicated() {
        let catalog = DropCatalog::from_entries(test_entries()).unwrap();
        assert_eq!(catalog.all_sources(), vec!["Vorkath", "Zulrah"]);
    }

    #[test]
    fn test_duplicate_items_rejected() {
        let mut entries = test_entries();
        entries.push(entries[0].clone());
        assert!(matches!(
            DropCatalog::from_entries(entries),
            Err(CatalogError::DuplicateItem { id: 12936, .. })
        ));
    }

    #[test]
    fn test_manifest_round_trip_through_file() {
        let catalog = DropCatalog::from_entries(test_entries()).unwrap();
        let json = serde_json::to_string_pretty(&catalog.to_manifest()).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = DropCatalog::load(file.path()).unwrap();
        assert_eq!(loaded.entries(), catalog.entries());
    }

    #[test]
    fn test_load_rejects_invalid_drop() {
        let json = r#"{
            "version": 1,
            "drops": [{
                "item_id": 1,
                "item_name": "Broken",
                "drop": {"type": "binomial", "rolls": [{"source": "Vorkath", "drop_chance": 2.0}]}
            }]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let err = DropCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
        assert!(err.to_string().contains("Drop chance"));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let manifest = CatalogManifest {
            version: 99,
            drops: Vec::new(),
        };
        assert!(matches!(
            DropCatalog::from_manifest(manifest),
            Err(CatalogError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = DropCatalog::load("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
