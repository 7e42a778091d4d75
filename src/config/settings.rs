//! Resolved run settings with provenance
//!
//! Settings come from three layers: built-in defaults, an optional
//! `combine.toml`, then command-line flags. The result names the body,
//! the rules directory, the ordered rule list and every destination.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::BuiltinDefaults;
use super::layer::{merge_layers, CliOverrides, SettingsLayer};
use crate::document::sha256_hex;

/// Settings file read from the working directory when `--config` is absent
pub const DEFAULT_SETTINGS_FILE: &str = "combine.toml";

/// Origin of a settings layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing settings layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub base: PathBuf,
    pub rules_dir: PathBuf,
    /// Rule file names in append order
    pub rules: Vec<String>,
    /// Written in this order; the first failure stops the rest
    pub destinations: Vec<PathBuf>,
    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

impl Settings {
    /// Resolve settings, reading `explicit` if given or `combine.toml` if present.
    ///
    /// An explicit settings file must exist; the default one is optional.
    pub fn resolve(explicit: Option<&Path>, cli: &CliOverrides) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::build(Some(path), cli),
            None => Self::build(Some(Path::new(DEFAULT_SETTINGS_FILE)), cli),
        }
    }

    /// Build settings from layers. A settings file that does not exist is skipped.
    ///
    /// Relative paths in the settings file are taken relative to the file's
    /// own directory; relative paths on the command line are taken relative
    /// to the working directory.
    pub fn build(settings_path: Option<&Path>, cli: &CliOverrides) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_layer());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layer 2: Settings file
        if let Some(path) = settings_path {
            if path.exists() {
                let (layer, digest) = Self::load_toml_file(path)?;
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                layers.push(layer.anchored(dir));
                sources.push(ConfigSource {
                    origin: ConfigOrigin::File,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            }
        }

        // Layer 3: CLI overrides
        if !cli.is_empty() {
            layers.push(cli.clone());
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let missing = |key: &str| ConfigError::ValidationError(format!("{} is not set", key));

        let settings = Self {
            base: expand_home(&merged.base.ok_or_else(|| missing("base"))?),
            rules_dir: expand_home(&merged.rules_dir.ok_or_else(|| missing("rules_dir"))?),
            rules: merged.rules.ok_or_else(|| missing("rules"))?,
            destinations: merged
                .destinations
                .ok_or_else(|| missing("destinations"))?
                .iter()
                .map(|d| expand_home(d))
                .collect(),
            sources,
        };
        settings.validate()?;

        Ok(settings)
    }

    /// Load and parse a TOML settings file, returning the layer and digest
    fn load_toml_file(path: &Path) -> Result<(SettingsLayer, String), ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let digest = sha256_hex(&bytes);

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let layer: SettingsLayer = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((layer, digest))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.base.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("base must not be empty".to_string()));
        }

        if self.rules_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "rules_dir must not be empty".to_string(),
            ));
        }

        if let Some(pos) = self.rules.iter().position(|r| r.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "rules[{}] must not be empty",
                pos
            )));
        }

        if self.destinations.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one destination is required".to_string(),
            ));
        }

        if let Some(pos) = self.destinations.iter().position(|d| d.as_os_str().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "destinations[{}] must not be empty",
                pos
            )));
        }

        Ok(())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Resolve a leading `~` component against `$HOME`; other paths are returned as-is
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Settings file not found: {}", .0.display())]
    NotFound(PathBuf),
}
