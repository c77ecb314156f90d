//! Evaluate and report command handlers

use super::catalog::load_catalog;
use crate::config::Config;
use anyhow::{bail, Context, Result};
use dropluck::{
    CollectionSnapshot, Evaluation, KillCountTable, LuckDrynessCalculator, ObservedItem,
    PlayerConfig,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Options shared by `evaluate` for a single item
pub struct EvaluateArgs {
    pub item: String,
    pub quantity: Option<u64>,
    pub kill_counts: Vec<String>,
    pub snapshot: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub foreign: bool,
}

/// Handle the evaluate command
pub fn evaluate(args: EvaluateArgs, config: &Config) -> Result<()> {
    let catalog = load_catalog(&config.catalog_path(args.catalog))?;

    let snapshot = match &args.snapshot {
        Some(path) => Some(load_snapshot(path)?),
        None => None,
    };

    let mut kill_counts = snapshot
        .as_ref()
        .map(CollectionSnapshot::kill_count_table)
        .unwrap_or_default();
    for assignment in &args.kill_counts {
        let (name, count) = parse_kill_count(assignment)?;
        kill_counts.insert(name, count);
    }

    let Some(entry) = catalog.get_by_name(&args.item) else {
        let suggestions: Vec<&str> = catalog
            .find(&args.item)
            .into_iter()
            .map(|e| e.item_name.as_str())
            .collect();
        if suggestions.is_empty() {
            bail!("No drop defined for '{}'", args.item);
        }
        bail!(
            "No drop defined for '{}'. Did you mean: {}?",
            args.item,
            suggestions.join(", ")
        );
    };

    let mut item = snapshot
        .as_ref()
        .and_then(|s| s.item(&entry.item_name))
        .cloned()
        .unwrap_or_else(|| ObservedItem::new(entry.item_id, entry.item_name.as_str(), 0));
    if let Some(quantity) = args.quantity {
        item.quantity = quantity;
    }

    let player = player_config(config, args.foreign);
    let calculator = LuckDrynessCalculator::new(catalog);
    let evaluation = calculator.evaluate(&item, &kill_counts, player)?;

    println!("{} x{}", item.name, item.quantity);
    for roll in entry_sources(&calculator, &item) {
        println!("  {:<30} {:>10}", roll, kill_counts.get(&roll));
    }
    println!();
    match evaluation {
        Evaluation::Computed(result) => {
            println!("Luck:    {:>8.2}%", result.luck * 100.0);
            println!("Dryness: {:>8.2}%", result.dryness * 100.0);
            println!("Exact:   {:>8.2}%", result.exact() * 100.0);
        }
        Evaluation::Incalculable(reason) => println!("{}", reason),
    }

    Ok(())
}

/// One row of a report
#[derive(Debug, Serialize, PartialEq)]
struct ReportRow {
    item: String,
    quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    luck: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dryness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Handle the report command
pub fn report(
    snapshot_path: &Path,
    catalog: Option<PathBuf>,
    foreign: bool,
    json: bool,
    config: &Config,
) -> Result<()> {
    let catalog = load_catalog(&config.catalog_path(catalog))?;
    let snapshot = load_snapshot(snapshot_path)?;
    let kill_counts = snapshot.kill_count_table();

    let calculator = LuckDrynessCalculator::new(catalog);
    let rows = build_report(
        &calculator,
        &snapshot.items,
        &kill_counts,
        player_config(config, foreign),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<32} {:>10} {:>9} {:>9}",
        "Item", "Quantity", "Luck", "Dryness"
    );
    println!("{}", "-".repeat(63));
    for row in &rows {
        match (row.luck, row.dryness, &row.reason) {
            (Some(luck), Some(dryness), _) => println!(
                "{:<32} {:>10} {:>8.2}% {:>8.2}%",
                row.item,
                row.quantity,
                luck * 100.0,
                dryness * 100.0
            ),
            (_, _, reason) => println!(
                "{:<32} {:>10}  {}",
                row.item,
                row.quantity,
                reason.as_deref().unwrap_or("")
            ),
        }
    }

    Ok(())
}

/// Evaluate every item, skipping ones the catalog has no drop for
fn build_report(
    calculator: &LuckDrynessCalculator,
    items: &[ObservedItem],
    kill_counts: &KillCountTable,
    config: Option<&dyn PlayerConfig>,
) -> Vec<ReportRow> {
    let mut ordered: Vec<&ObservedItem> = items.iter().collect();
    ordered.sort_by_key(|item| item.sequence);
    let ordered: Vec<ObservedItem> = ordered.into_iter().cloned().collect();

    calculator
        .evaluate_all(&ordered, kill_counts, config)
        .into_iter()
        .zip(&ordered)
        .filter_map(|(evaluation, item)| match evaluation {
            Ok(evaluation) => Some(ReportRow {
                item: item.name.clone(),
                quantity: item.quantity,
                luck: evaluation.result().map(|r| r.luck),
                dryness: evaluation.result().map(|r| r.dryness),
                reason: evaluation.reason().map(str::to_string),
            }),
            Err(e) => {
                tracing::debug!("skipping {}: {}", item.name, e);
                None
            }
        })
        .collect()
}

fn load_snapshot(path: &Path) -> Result<CollectionSnapshot> {
    CollectionSnapshot::load(path)
        .with_context(|| format!("Failed to load snapshot from {}", path.display()))
}

fn player_config(config: &Config, foreign: bool) -> Option<&dyn PlayerConfig> {
    if foreign {
        None
    } else {
        Some(config as &dyn PlayerConfig)
    }
}

fn entry_sources(calculator: &LuckDrynessCalculator, item: &ObservedItem) -> Vec<String> {
    calculator
        .catalog()
        .resolve(item)
        .map(|drop| {
            let mut sources: Vec<String> =
                drop.rolls().iter().map(|r| r.source.clone()).collect();
            sources.sort();
            sources.dedup();
            sources
        })
        .unwrap_or_default()
}

/// Parse a `NAME=COUNT` kill count
fn parse_kill_count(assignment: &str) -> Result<(String, u64)> {
    let (name, count) = assignment
        .rsplit_once('=')
        .with_context(|| format!("Expected NAME=COUNT, got '{}'", assignment))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("Kill count name is empty in '{}'", assignment);
    }
    let count: u64 = count
        .trim()
        .parse()
        .with_context(|| format!("Invalid kill count in '{}'", assignment))?;
    Ok((name.to_string(), count))
}
