//! Top-level CLI definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use super::catalog::CatalogCommand;

#[derive(Parser)]
#[command(name = "dropluck")]
#[command(about = "Luck and dryness of collection log drops", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate luck and dryness for one item
    #[command(visible_alias = "e")]
    Evaluate {
        /// Item name (e.g. "Tanzanite fang")
        #[arg(required = true, num_args = 1..)]
        item: Vec<String>,

        /// Observed quantity (taken from the snapshot if not provided)
        #[arg(short, long)]
        quantity: Option<u64>,

        /// Kill count as NAME=COUNT (repeatable, added to snapshot counts)
        #[arg(long = "kc", value_name = "NAME=COUNT")]
        kill_counts: Vec<String>,

        /// Collection snapshot JSON with kill counts and items
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Path to drop catalog (uses configured default if not provided)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Evaluate as someone else's log (ignore personal options)
        #[arg(long)]
        foreign: bool,
    },

    /// Evaluate every item in a collection snapshot
    #[command(visible_alias = "r")]
    Report {
        /// Collection snapshot JSON with kill counts and items
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Path to drop catalog (uses configured default if not provided)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Evaluate as someone else's log (ignore personal options)
        #[arg(long)]
        foreign: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drop catalog operations (find, list, validate)
    #[command(visible_alias = "d")]
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },

    /// Configure personal options and defaults
    #[command(visible_alias = "c")]
    Configure {
        /// Set a personal option as KEY=VALUE (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Remove a personal option (repeatable)
        #[arg(long = "unset", value_name = "KEY")]
        unset: Vec<String>,

        /// Set the default drop catalog path
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
