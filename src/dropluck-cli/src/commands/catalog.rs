//! Drop catalog command handlers

use crate::cli::CatalogCommand;
use crate::config::Config;
use anyhow::{Context, Result};
use dropluck::{CatalogEntry, DropCatalog, DropKind};
use std::path::Path;

/// Handle the catalog command
pub fn handle(command: CatalogCommand, config: &Config) -> Result<()> {
    match command {
        CatalogCommand::Find { item, catalog } => {
            find(&item.join(" "), &config.catalog_path(catalog))
        }
        CatalogCommand::List { sources, catalog } => list(&config.catalog_path(catalog), sources),
        CatalogCommand::Validate { catalog } => validate(&config.catalog_path(catalog)),
    }
}

/// Load a catalog, naming the file on failure
pub fn load_catalog(path: &Path) -> Result<DropCatalog> {
    DropCatalog::load(path)
        .with_context(|| format!("Failed to load drop catalog from {}", path.display()))
}

fn find(item: &str, catalog_path: &Path) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let entries = catalog.find(item);

    if entries.is_empty() {
        println!("No drops found for '{}'", item);
        println!("\nTry a partial name like 'fang' or 'scales'");
        return Ok(());
    }

    for entry in entries {
        print_entry(entry);
    }

    Ok(())
}

fn print_entry(entry: &CatalogEntry) {
    println!("{} (id {})", entry.item_name, entry.item_id);
    println!("  Model: {}", describe_kind(entry.drop.kind()));

    for roll in entry.drop.rolls() {
        let per_unit = if roll.attempts_per_unit > 1 {
            format!(" x{} per kill", roll.attempts_per_unit)
        } else {
            String::new()
        };
        println!(
            "  {:<30} {:>12}{}",
            roll.source,
            format_chance(roll.drop_chance),
            per_unit
        );
    }

    for adjustment in entry.drop.adjustments() {
        println!(
            "  Option {:<23} {} ({})",
            adjustment.key,
            adjustment.role,
            adjustment.display_name()
        );
    }
    println!();
}

fn describe_kind(kind: DropKind) -> String {
    match kind {
        DropKind::Binomial => "one item per success".to_string(),
        DropKind::GuaranteedOnce {
            guaranteed_on_attempts,
        } => format!(
            "one item per success, guaranteed by attempt {}",
            guaranteed_on_attempts
        ),
        DropKind::UniformSum { min_roll, max_roll } => {
            format!("{}-{} items per success", min_roll, max_roll)
        }
    }
}

/// Format a chance as "1/512" when it is a clean reciprocal, else a percentage
fn format_chance(chance: f64) -> String {
    let reciprocal = 1.0 / chance;
    if (reciprocal - reciprocal.round()).abs() < 1e-6 {
        format!("1/{}", reciprocal.round() as u64)
    } else {
        format!("{:.4}%", chance * 100.0)
    }
}

fn list(catalog_path: &Path, list_sources: bool) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;

    if list_sources {
        let sources = catalog.all_sources();
        println!("Known kill-count sources ({}):\n", sources.len());
        for source in sources {
            println!("  {}", source);
        }
    } else {
        let mut items: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|e| e.item_name.as_str())
            .collect();
        items.sort();
        println!("Known items ({}):\n", items.len());
        for item in items {
            println!("  {}", item);
        }
    }

    Ok(())
}

fn validate(catalog_path: &Path) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    println!(
        "{}: {} drops, {} sources, all valid",
        catalog_path.display(),
        catalog.len(),
        catalog.all_sources().len()
    );
    Ok(())
}
