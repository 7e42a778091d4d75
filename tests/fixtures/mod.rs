//! Test fixtures: a karabiner.json body and the four layer rules
//!
//! The rules are listed in the order they must be combined: later layers
//! rely on variables set by earlier ones.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Rule files in combine order
pub const RULES_ORDERED: [&str; 4] = [
    "nav_layer.json",
    "top_layer.json",
    "combo_keys.json",
    "number_layer.json",
];

/// Root of the karabiner fixture
pub fn karabiner_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/karabiner")
}

/// Path to the body fixture
pub fn body_path() -> PathBuf {
    karabiner_root().join("body.json")
}

/// Path to the rules directory fixture
pub fn rules_dir() -> PathBuf {
    karabiner_root().join("rules")
}

/// Parse a JSON file
pub fn read_json(path: &Path) -> Value {
    let bytes = fs::read(path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e));
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("parse {}: {}", path.display(), e))
}

/// Write a value as JSON
pub fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}
