//! CLI argument definitions for dropluck
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod args;
mod catalog;

pub use args::{Cli, Commands};
pub use catalog::CatalogCommand;
