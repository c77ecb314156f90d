//! # dropluck
//!
//! Luck and dryness of collected items relative to kill counts.
//!
//! Given how many of an item a player has, how many times they killed the
//! monsters that drop it, and how the item drops, this library answers
//! two questions:
//! - **luck**: the chance a random player with the same kill counts would
//!   have fewer
//! - **dryness**: the chance they would have more
//!
//! ## Example
//!
//! ```
//! use dropluck::{
//!     CatalogEntry, Drop, DropCatalog, Evaluation, KillCountTable, LuckDrynessCalculator,
//!     ObservedItem,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = DropCatalog::from_entries(vec![CatalogEntry {
//!     item_id: 12922,
//!     item_name: "Tanzanite fang".to_string(),
//!     drop: Drop::binomial().roll("Zulrah", 1.0 / 512.0).build()?,
//! }])?;
//! let calculator = LuckDrynessCalculator::new(catalog);
//!
//! let mut kill_counts = KillCountTable::new();
//! kill_counts.insert("Zulrah", 1_000);
//!
//! let item = ObservedItem::new(12922, "Tanzanite fang", 1);
//! if let Evaluation::Computed(result) = calculator.evaluate(&item, &kill_counts, None)? {
//!     println!("{}", result);
//! }
//! # Ok(())
//! # }
//! ```

pub mod attempts;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod drops;
pub mod roll;
pub mod snapshot;
pub mod stats;
pub mod types;

// Re-export commonly used items
#[doc(inline)]
pub use attempts::{Attempts, BinomialTerm, KillCountTable};
#[doc(inline)]
pub use calculator::LuckDrynessCalculator;
#[doc(inline)]
pub use catalog::{CatalogEntry, CatalogError, CatalogManifest, DropCatalog, CATALOG_VERSION};
#[doc(inline)]
pub use config::{AdjustmentRole, ConfigAdjustment, OptionValue, PlayerConfig};
#[doc(inline)]
pub use drops::{Drop, DropBuilder, DropDefinition, DropKind, Regime};
#[doc(inline)]
pub use roll::RollSpec;
#[doc(inline)]
pub use snapshot::{CollectionSnapshot, KillCountEntry, SnapshotError};
#[doc(inline)]
pub use types::{Evaluation, LuckResult, ObservedItem};
