//! CLI definitions for the catalog command

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Show how an item drops (exact name, or every partial match)
    Find {
        /// Item name to search for (e.g., "Tanzanite fang", "scales")
        #[arg(required = true, num_args = 1..)]
        item: Vec<String>,

        /// Path to drop catalog (uses configured default if not provided)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List all items in the catalog
    List {
        /// List kill-count sources instead of items
        #[arg(long)]
        sources: bool,

        /// Path to drop catalog (uses configured default if not provided)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Check that every drop definition in a catalog is valid
    Validate {
        /// Path to drop catalog (uses configured default if not provided)
        catalog: Option<PathBuf>,
    },
}
