//! Karabiner Combiner - assemble karabiner.json from ordered rule fragments
//!
//! This crate builds a Karabiner-Elements `karabiner.json` from a body
//! document and a directory of complex-modification rules. Rules are
//! appended to `profiles[0].complex_modifications.rules` in a fixed order
//! and the result is written to one or more destinations.

pub mod catalog;
pub mod combiner;
pub mod config;
pub mod document;
pub mod error;
pub mod report;

pub use catalog::{CatalogError, RuleCatalog};
pub use combiner::{Combiner, LoadedSource, SavedOutput, SourceRole};
pub use config::{CliOverrides, ConfigError, Settings};
pub use document::{BaseDocument, FaultKind, PathFault, RULES_PATH};
pub use error::CombineError;
pub use report::BuildReport;
