//! Configuration command handlers
//!
//! Handles the `configure` subcommand for personal options and defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
///
/// # Arguments
/// * `set` - `KEY=VALUE` options to set
/// * `unset` - option keys to remove
/// * `catalog` - Optional default catalog path
/// * `show` - If true, show current configuration
pub fn handle(
    set: &[String],
    unset: &[String],
    catalog: Option<PathBuf>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if set.is_empty() && unset.is_empty() && catalog.is_none() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, set, unset, catalog)?;
    config.save()?;

    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Apply the requested changes to a config
fn apply(
    config: &mut Config,
    set: &[String],
    unset: &[String],
    catalog: Option<PathBuf>,
) -> Result<()> {
    for assignment in set {
        let (key, value) = config.set_option(assignment)?;
        println!("{} = {}", key, value);
    }

    for key in unset {
        match config.unset_option(key) {
            Some(_) => println!("Removed {}", key),
            None => println!("{} was not set", key),
        }
    }

    if let Some(path) = catalog {
        println!("Default catalog: {}", path.display());
        config.catalog = Some(path);
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    println!(
        "Catalog: {}",
        config.catalog_path(None).display()
    );

    if config.options.is_empty() {
        println!("No personal options configured");
    } else {
        println!("Options:");
        for (key, value) in &config.options {
            println!("  {:<30} {}", key, value);
        }
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: dropluck configure --set KEY=VALUE [--set KEY=VALUE ...]");
    println!("   or: dropluck configure --unset KEY");
    println!("   or: dropluck configure --catalog PATH");
    println!("   or: dropluck configure --show");
    println!();
    println!("Note: Options record things only you know, such as items you bought");
    println!("      or mechanics you want modelled. They are ignored with --foreign.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropluck::OptionValue;

    #[test]
    fn test_show_usage_does_not_panic() {
        show_usage();
    }

    #[test]
    fn test_apply_changes() {
        let mut config = Config::default();
        apply(
            &mut config,
            &["bought=3".to_string(), "gate=on".to_string()],
            &[],
            Some(PathBuf::from("mine.json")),
        )
        .unwrap();

        assert_eq!(config.options.get("bought"), Some(&OptionValue::Int(3)));
        assert_eq!(config.options.get("gate"), Some(&OptionValue::Bool(true)));
        assert_eq!(config.catalog, Some(PathBuf::from("mine.json")));

        apply(&mut config, &[], &["bought".to_string()], None).unwrap();
        assert!(!config.options.contains_key("bought"));
    }

    #[test]
    fn test_apply_rejects_bad_assignment() {
        let mut config = Config::default();
        assert!(apply(&mut config, &["oops".to_string()], &[], None).is_err());
    }
}
