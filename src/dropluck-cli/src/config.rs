//! Configuration management for dropluck CLI
//!
//! Personal options live in the `[options]` table. They describe things
//! only the player knows (items bought, mechanics to model) and are what
//! drop adjustments read.

use anyhow::{Context, Result};
use dropluck::{OptionValue, PlayerConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog used when neither the command line nor the config names one
pub const DEFAULT_CATALOG_PATH: &str = "share/catalog.json";

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
}

impl PlayerConfig for Config {
    fn option(&self, key: &str) -> Option<OptionValue> {
        self.options.get(key).copied()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("dropluck");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Catalog path: explicit argument, then configured default, then built-in default
    pub fn catalog_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.catalog.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
    }

    /// Set an option from a `KEY=VALUE` string
    pub fn set_option(&mut self, assignment: &str) -> Result<(String, OptionValue)> {
        let (key, value) = assignment
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got '{}'", assignment))?;
        let key = key.trim().to_string();
        let value: OptionValue = value
            .parse()
            .with_context(|| format!("Option '{}' must be an integer or true/false", key))?;

        self.options.insert(key.clone(), value);
        Ok((key, value))
    }

    /// Remove an option, returning its previous value
    pub fn unset_option(&mut self, key: &str) -> Option<OptionValue> {
        self.options.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.catalog = Some(PathBuf::from("/data/catalog.json"));
        config.set_option("scales_bought=5000").unwrap();
        config.set_option("model_pet_reroll=true").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.int_option("scales_bought"), 5000);
        assert!(loaded.bool_option("model_pet_reroll"));
    }

    #[test]
    fn test_parse_handwritten_toml() {
        let config: Config = toml::from_str(
            r#"
            catalog = "share/catalog.json"

            [options]
            visages_bought = 2
            model_champion_scrolls = false
            "#,
        )
        .unwrap();
        assert_eq!(config.option("visages_bought"), Some(OptionValue::Int(2)));
        assert_eq!(
            config.option("model_champion_scrolls"),
            Some(OptionValue::Bool(false))
        );
    }

    #[test]
    fn test_set_option_rejects_garbage() {
        let mut config = Config::default();
        assert!(config.set_option("no_equals_sign").is_err());
        assert!(config.set_option("count=lots").is_err());
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_unset_option() {
        let mut config = Config::default();
        config.set_option("a=1").unwrap();
        assert_eq!(config.unset_option("a"), Some(OptionValue::Int(1)));
        assert_eq!(config.unset_option("a"), None);
    }

    #[test]
    fn test_catalog_path_precedence() {
        let mut config = Config::default();
        assert_eq!(config.catalog_path(None), PathBuf::from(DEFAULT_CATALOG_PATH));

        config.catalog = Some(PathBuf::from("configured.json"));
        assert_eq!(config.catalog_path(None), PathBuf::from("configured.json"));
        assert_eq!(
            config.catalog_path(Some(PathBuf::from("explicit.json"))),
            PathBuf::from("explicit.json")
        );
    }
}
