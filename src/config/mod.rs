//! Settings merge system
//!
//! Implements the 3-layer settings merge:
//! 1. Built-in defaults
//! 2. Settings file (combine.toml)
//! 3. CLI flags

mod defaults;
mod layer;
mod settings;

pub use defaults::BuiltinDefaults;
pub use layer::{merge_layers, CliOverrides, SettingsLayer};
pub use settings::{
    expand_home, ConfigError, ConfigOrigin, ConfigSource, Settings, DEFAULT_SETTINGS_FILE,
};
