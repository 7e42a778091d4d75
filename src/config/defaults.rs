//! Built-in defaults (layer 1)
//!
//! The layout of a dotfiles checkout: body and rules under `json_files/`,
//! a backup copy next to them, and the live file Karabiner-Elements reads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::layer::SettingsLayer;

/// Built-in default settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Body of karabiner.json (default: "./json_files/body/body.json")
    pub base: String,

    /// Directory holding rule fragments (default: "./json_files/rules")
    pub rules_dir: String,

    /// Rule file names in append order
    pub rules: Vec<String>,

    /// Where the merged file is written: a backup for version control,
    /// then the live Karabiner-Elements config
    pub destinations: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            base: "./json_files/body/body.json".to_string(),
            rules_dir: "./json_files/rules".to_string(),
            rules: vec![
                "nav_layer.json".to_string(),
                "top_layer.json".to_string(),
                "combo_keys.json".to_string(),
                "number_layer.json".to_string(),
            ],
            destinations: vec![
                "./karabiner.json".to_string(),
                "~/.config/karabiner/karabiner.json".to_string(),
            ],
        }
    }
}

impl BuiltinDefaults {
    /// Convert to the lowest settings layer
    pub fn to_layer(&self) -> SettingsLayer {
        SettingsLayer {
            base: Some(PathBuf::from(&self.base)),
            rules_dir: Some(PathBuf::from(&self.rules_dir)),
            rules: Some(self.rules.clone()),
            destinations: Some(self.destinations.iter().map(PathBuf::from).collect()),
        }
    }
}
