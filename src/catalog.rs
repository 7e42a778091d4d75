//! Rule directory inventory
//!
//! Compares the rule files present in the rules directory with the ordered
//! list that will be combined. A rule that exists but is not listed is
//! silently left out of karabiner.json, which is easy to miss.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Errors for catalog scans
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Rules directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),
}

/// Result of comparing a rules directory with a rule list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleCatalog {
    pub rules_dir: PathBuf,

    /// `*.json` files found in the directory, sorted by name
    pub available: Vec<String>,

    /// Present in the directory but not listed
    pub unlisted: Vec<String>,

    /// Listed but not present in the directory
    pub missing: Vec<String>,
}

impl RuleCatalog {
    /// Scan `rules_dir` (top level only) against `listed`
    pub fn scan<S: AsRef<str>>(rules_dir: &Path, listed: &[S]) -> Result<Self, CatalogError> {
        if !rules_dir.is_dir() {
            return Err(CatalogError::NotFound(rules_dir.to_path_buf()));
        }

        let mut available = Vec::new();
        for entry in WalkDir::new(rules_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_json = entry
                .path()
                .extension()
                .map(|ext| ext == "json")
                .unwrap_or(false);
            if is_json {
                available.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        let unlisted = available
            .iter()
            .filter(|name| !listed.iter().any(|l| l.as_ref() == name.as_str()))
            .cloned()
            .collect();

        let mut missing: Vec<String> = Vec::new();
        for name in listed {
            let name = name.as_ref();
            if !rules_dir.join(name).is_file() && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }

        Ok(Self {
            rules_dir: rules_dir.to_path_buf(),
            available,
            unlisted,
            missing,
        })
    }

    /// True when every listed rule exists
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Human-readable summary
    pub fn to_human(&self) -> String {
        let mut out = format!(
            "Rules directory: {} ({} rule files)\n",
            self.rules_dir.display(),
            self.available.len()
        );
        if self.unlisted.is_empty() && self.missing.is_empty() {
            out.push_str("  All rule files are listed and present.\n");
        }
        for name in &self.unlisted {
            out.push_str(&format!("  unlisted: {}\n", name));
        }
        for name in &self.missing {
            out.push_str(&format!("  missing:  {}\n", name));
        }
        out
    }
}
