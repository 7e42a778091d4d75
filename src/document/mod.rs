//! JSON documents: loading, the body of karabiner.json, and stable output
//!
//! The body and every rule are plain `serde_json::Value` trees. Objects keep
//! the key order they were read with, so writing the merged body back out
//! produces diffs that only show the appended rules.

mod path;

pub use path::{FaultKind, JsonPath, PathFault, Segment, RULES_PATH};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::error::CombineError;

/// Indentation used for every written karabiner.json
pub const INDENT: &[u8] = b"    ";

/// A JSON file read from disk with the digest of its raw bytes
#[derive(Debug, Clone)]
pub struct LoadedJson {
    pub value: Value,
    /// SHA-256 of the file contents, hex encoded
    pub digest: String,
}

/// Read and parse a JSON file.
///
/// The file is read in one call, so no handle outlives this function.
pub fn load_json(path: &Path) -> Result<LoadedJson, CombineError> {
    let bytes = fs::read(path).map_err(|source| CombineError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let digest = sha256_hex(&bytes);

    let value = serde_json::from_slice(&bytes).map_err(|source| CombineError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(LoadedJson { value, digest })
}

/// Hex-encoded SHA-256 of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Serialize a value with 4-space indentation and a trailing newline
pub fn to_pretty_bytes(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// The body of karabiner.json with a verified rules array.
///
/// Construction checks `profiles[0].complex_modifications.rules` once, so
/// a malformed body is rejected before any rule is read.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseDocument {
    root: Value,
}

impl BaseDocument {
    /// Wrap a parsed body after checking the rules path
    pub fn from_value(root: Value) -> Result<Self, PathFault> {
        RULES_PATH.resolve(&root)?;
        Ok(Self { root })
    }

    /// Append one rule as the last element of the rules array
    pub fn append_rule(&mut self, rule: Value) -> Result<(), PathFault> {
        RULES_PATH.resolve_mut(&mut self.root)?.push(rule);
        Ok(())
    }

    /// Rules currently in the document, in order
    pub fn rules(&self) -> &[Value] {
        RULES_PATH
            .resolve(&self.root)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Serialized form written to every destination
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        to_pretty_bytes(&self.root)
    }
}
