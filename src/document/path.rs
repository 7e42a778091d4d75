//! Fixed paths into a JSON document
//!
//! A `JsonPath` is a short list of object keys and array indices. Resolving
//! it walks the tree one segment at a time and reports the first segment
//! that does not match, so a malformed body names exactly what is wrong.

use std::fmt;

use serde_json::Value;

/// One step of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Member of an object
    Key(&'static str),
    /// Element of an array
    Index(usize),
}

/// A fixed path ending in an array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonPath {
    segments: &'static [Segment],
}

/// Location of the complex-modification rules inside karabiner.json
pub const RULES_PATH: JsonPath = JsonPath::new(&[
    Segment::Key("profiles"),
    Segment::Index(0),
    Segment::Key("complex_modifications"),
    Segment::Key("rules"),
]);

/// Why a path did not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    Missing,
    NotObject,
    NotArray,
    OutOfRange { len: usize },
}

/// The first segment of a path that failed to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFault {
    /// Dotted rendering of the path up to the failing node
    pub at: String,
    pub kind: FaultKind,
}

impl PathFault {
    pub fn new(at: impl Into<String>, kind: FaultKind) -> Self {
        Self { at: at.into(), kind }
    }
}

impl fmt::Display for PathFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FaultKind::Missing => write!(f, "`{}` is missing", self.at),
            FaultKind::NotObject => write!(f, "`{}` is not an object", self.at),
            FaultKind::NotArray => write!(f, "`{}` is not an array", self.at),
            FaultKind::OutOfRange { len: 0 } => write!(f, "`{}` is empty", self.at),
            FaultKind::OutOfRange { len } => {
                write!(f, "`{}` is out of range (length {})", self.at, len)
            }
        }
    }
}

impl std::error::Error for PathFault {}

impl JsonPath {
    pub const fn new(segments: &'static [Segment]) -> Self {
        Self { segments }
    }

    /// Render the first `depth` segments, e.g. `profiles[0].complex_modifications`
    pub fn display_prefix(&self, depth: usize) -> String {
        let mut out = String::new();
        for segment in &self.segments[..depth.min(self.segments.len())] {
            match segment {
                Segment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                Segment::Index(index) => {
                    out.push_str(&format!("[{}]", index));
                }
            }
        }
        if out.is_empty() {
            out.push_str("<root>");
        }
        out
    }

    /// Resolve to the target array
    pub fn resolve<'a>(&self, root: &'a Value) -> Result<&'a Vec<Value>, PathFault> {
        let mut current = root;
        for (depth, segment) in self.segments.iter().enumerate() {
            current = match segment {
                Segment::Key(key) => {
                    let map = current.as_object().ok_or_else(|| {
                        PathFault::new(self.display_prefix(depth), FaultKind::NotObject)
                    })?;
                    map.get(*key).ok_or_else(|| {
                        PathFault::new(self.display_prefix(depth + 1), FaultKind::Missing)
                    })?
                }
                Segment::Index(index) => {
                    let items = current.as_array().ok_or_else(|| {
                        PathFault::new(self.display_prefix(depth), FaultKind::NotArray)
                    })?;
                    items.get(*index).ok_or_else(|| {
                        PathFault::new(
                            self.display_prefix(depth),
                            FaultKind::OutOfRange { len: items.len() },
                        )
                    })?
                }
            };
        }
        current.as_array().ok_or_else(|| {
            PathFault::new(self.display_prefix(self.segments.len()), FaultKind::NotArray)
        })
    }

    /// Resolve to the target array for appending
    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Result<&'a mut Vec<Value>, PathFault> {
        let mut current = root;
        for (depth, segment) in self.segments.iter().enumerate() {
            current = match segment {
                Segment::Key(key) => {
                    let map = current.as_object_mut().ok_or_else(|| {
                        PathFault::new(self.display_prefix(depth), FaultKind::NotObject)
                    })?;
                    map.get_mut(*key).ok_or_else(|| {
                        PathFault::new(self.display_prefix(depth + 1), FaultKind::Missing)
                    })?
                }
                Segment::Index(index) => {
                    let items = current.as_array_mut().ok_or_else(|| {
                        PathFault::new(self.display_prefix(depth), FaultKind::NotArray)
                    })?;
                    let len = items.len();
                    items.get_mut(*index).ok_or_else(|| {
                        PathFault::new(self.display_prefix(depth), FaultKind::OutOfRange { len })
                    })?
                }
            };
        }
        current.as_array_mut().ok_or_else(|| {
            PathFault::new(self.display_prefix(self.segments.len()), FaultKind::NotArray)
        })
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_prefix(self.segments.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rules_path_display() {
        assert_eq!(RULES_PATH.to_string(), "profiles[0].complex_modifications.rules");
        assert_eq!(RULES_PATH.display_prefix(0), "<root>");
        assert_eq!(RULES_PATH.display_prefix(2), "profiles[0]");
    }

    #[test]
    fn test_resolve_existing_rules() {
        let doc = json!({
            "profiles": [{"complex_modifications": {"rules": [{"x": 1}]}}]
        });
        let rules = RULES_PATH.resolve(&doc).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_missing_profiles() {
        let doc = json!({"global": {}});
        let fault = RULES_PATH.resolve(&doc).unwrap_err();
        assert_eq!(fault, PathFault::new("profiles", FaultKind::Missing));
    }

    #[test]
    fn test_profiles_not_array() {
        let doc = json!({"profiles": {"name": "Default"}});
        let fault = RULES_PATH.resolve(&doc).unwrap_err();
        assert_eq!(fault.kind, FaultKind::NotArray);
        assert_eq!(fault.at, "profiles");
    }

    #[test]
    fn test_empty_profiles() {
        let doc = json!({"profiles": []});
        let fault = RULES_PATH.resolve(&doc).unwrap_err();
        assert_eq!(fault.kind, FaultKind::OutOfRange { len: 0 });
        assert_eq!(fault.to_string(), "`profiles` is empty");
    }

    #[test]
    fn test_missing_complex_modifications() {
        let doc = json!({"profiles": [{"name": "Default"}]});
        let fault = RULES_PATH.resolve(&doc).unwrap_err();
        assert_eq!(fault.at, "profiles[0].complex_modifications");
        assert_eq!(fault.kind, FaultKind::Missing);
    }

    #[test]
    fn test_rules_not_array() {
        let doc = json!({"profiles": [{"complex_modifications": {"rules": {}}}]});
        let fault = RULES_PATH.resolve(&doc).unwrap_err();
        assert_eq!(fault.at, "profiles[0].complex_modifications.rules");
        assert_eq!(fault.kind, FaultKind::NotArray);
    }

    #[test]
    fn test_root_not_object() {
        let doc = json!([1, 2, 3]);
        let fault = RULES_PATH.resolve(&doc).unwrap_err();
        assert_eq!(fault.at, "<root>");
        assert_eq!(fault.kind, FaultKind::NotObject);
    }

    #[test]
    fn test_resolve_mut_appends() {
        let mut doc = json!({
            "profiles": [{"complex_modifications": {"rules": []}}]
        });
        RULES_PATH.resolve_mut(&mut doc).unwrap().push(json!({"a": 1}));
        assert_eq!(doc["profiles"][0]["complex_modifications"]["rules"][0]["a"], 1);
    }

    #[test]
    fn test_resolve_mut_reports_same_fault() {
        let mut doc = json!({"profiles": [{"complex_modifications": {}}]});
        let fault = RULES_PATH.resolve_mut(&mut doc).unwrap_err();
        assert_eq!(fault, RULES_PATH.resolve(&doc).unwrap_err());
    }
}
