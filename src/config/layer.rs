//! Settings layers and their overlay
//!
//! Each layer sets some of the four settings. A later layer replaces a
//! key wholesale: a `rules` list given on the command line is the complete
//! ordered list, not an addition to the one in `combine.toml`.
//!
//! Paths stay `PathBuf` through every layer so names that are not valid
//! UTF-8 reach the filesystem unchanged.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One settings layer; `None` leaves lower layers alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destinations: Option<Vec<PathBuf>>,
}

/// Values given on the command line
pub type CliOverrides = SettingsLayer;

impl SettingsLayer {
    pub fn is_empty(&self) -> bool {
        self.base.is_none()
            && self.rules_dir.is_none()
            && self.rules.is_none()
            && self.destinations.is_none()
    }

    /// Replace every key `overlay` sets
    pub fn overlay(self, overlay: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            base: overlay.base.or(self.base),
            rules_dir: overlay.rules_dir.or(self.rules_dir),
            rules: overlay.rules.or(self.rules),
            destinations: overlay.destinations.or(self.destinations),
        }
    }

    /// Resolve relative paths against `dir`, the settings file's directory.
    ///
    /// Absolute paths and paths starting with `~` are left alone.
    pub fn anchored(self, dir: &Path) -> SettingsLayer {
        let anchor = |path: PathBuf| {
            if path.is_relative() && !path.starts_with("~") {
                dir.join(path)
            } else {
                path
            }
        };

        SettingsLayer {
            base: self.base.map(anchor),
            rules_dir: self.rules_dir.map(anchor),
            rules: self.rules,
            destinations: self
                .destinations
                .map(|paths| paths.into_iter().map(anchor).collect()),
        }
    }
}

/// Overlay layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<SettingsLayer>) -> SettingsLayer {
    layers
        .into_iter()
        .fold(SettingsLayer::default(), SettingsLayer::overlay)
}
