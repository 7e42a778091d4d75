//! Combine the karabiner.json body with ordered rule fragments
//!
//! Rules are appended to `profiles[0].complex_modifications.rules` in the
//! order given. Order matters: upstream layers change keybindings that
//! downstream rules build on (e.g. `nav_layer`, `top_layer`, `combo_keys`,
//! then `number_layer`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::document::{self, BaseDocument};
use crate::error::CombineError;

/// What a loaded file was used as
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceRole {
    Base,
    Rule,
}

/// A file read while combining
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadedSource {
    pub role: SourceRole,
    pub path: PathBuf,
    /// SHA-256 of the raw file bytes
    pub digest: String,
}

/// A destination written by [`Combiner::save`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedOutput {
    pub path: PathBuf,
    pub bytes: usize,
    /// SHA-256 of the written bytes
    pub digest: String,
}

/// Builds karabiner.json from a body file and a directory of rules.
///
/// The merged document is built once in [`Combiner::new`] and never
/// changes afterwards, so every save writes identical bytes.
#[derive(Debug, Clone)]
pub struct Combiner {
    rule_paths: Vec<PathBuf>,
    document: BaseDocument,
    sources: Vec<LoadedSource>,
}

impl Combiner {
    /// Load the body and append every rule in `rules_ordered`.
    ///
    /// Each rule is read from `rules_directory.join(name)`. Names may repeat;
    /// a repeated name appends the same rule again.
    pub fn new<S: AsRef<Path>>(
        base_path: impl AsRef<Path>,
        rules_directory: impl AsRef<Path>,
        rules_ordered: &[S],
    ) -> Result<Self, CombineError> {
        let base_path = base_path.as_ref().to_path_buf();
        let rules_directory = rules_directory.as_ref();
        let rule_paths: Vec<PathBuf> = rules_ordered
            .iter()
            .map(|name| rules_directory.join(name))
            .collect();

        let (document, sources) = Self::build(&base_path, &rule_paths)?;

        Ok(Self {
            rule_paths,
            document,
            sources,
        })
    }

    fn build(
        base_path: &Path,
        rule_paths: &[PathBuf],
    ) -> Result<(BaseDocument, Vec<LoadedSource>), CombineError> {
        let mut sources = Vec::with_capacity(rule_paths.len() + 1);

        let body = document::load_json(base_path)?;
        let mut merged =
            BaseDocument::from_value(body.value).map_err(|fault| CombineError::Structure {
                path: base_path.to_path_buf(),
                fault,
            })?;
        debug!(path = %base_path.display(), rules = merged.rules().len(), "loaded body");
        sources.push(LoadedSource {
            role: SourceRole::Base,
            path: base_path.to_path_buf(),
            digest: body.digest,
        });

        for rule_path in rule_paths {
            let rule = document::load_json(rule_path)?;
            merged
                .append_rule(rule.value)
                .map_err(|fault| CombineError::Structure {
                    path: base_path.to_path_buf(),
                    fault,
                })?;
            debug!(path = %rule_path.display(), "appended rule");
            sources.push(LoadedSource {
                role: SourceRole::Rule,
                path: rule_path.clone(),
                digest: rule.digest,
            });
        }

        Ok((merged, sources))
    }

    /// The merged karabiner.json
    pub fn merged(&self) -> &Value {
        self.document.as_value()
    }

    /// The rules array of the merged document
    pub fn rules(&self) -> &[Value] {
        self.document.rules()
    }

    /// Resolved rule locations in append order
    pub fn rule_paths(&self) -> &[PathBuf] {
        &self.rule_paths
    }

    /// Files read while building, body first
    pub fn sources(&self) -> &[LoadedSource] {
        &self.sources
    }

    /// Serialized merged document
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let bytes = self.document.to_pretty_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the merged document to `path`, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<SavedOutput, CombineError> {
        let path = path.as_ref();
        let write_error = |source: io::Error| CombineError::Write {
            path: path.to_path_buf(),
            source,
        };

        let bytes = self.document.to_pretty_bytes().map_err(|e| {
            write_error(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            ))
        })?;
        fs::write(path, &bytes).map_err(write_error)?;

        info!(path = %path.display(), bytes = bytes.len(), "wrote karabiner.json");
        Ok(SavedOutput {
            path: path.to_path_buf(),
            bytes: bytes.len(),
            digest: document::sha256_hex(&bytes),
        })
    }

    /// Write to each destination in order, stopping at the first failure.
    ///
    /// Destinations written before a failure are left in place.
    pub fn save_all<P: AsRef<Path>>(
        &self,
        destinations: &[P],
    ) -> Result<Vec<SavedOutput>, CombineError> {
        destinations.iter().map(|path| self.save(path)).collect()
    }
}
