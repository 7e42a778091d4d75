//! Build report printed by `karabiner-combine build --json`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combiner::{Combiner, LoadedSource, SavedOutput};

/// Schema version for the build report
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for the build report
pub const REPORT_SCHEMA_ID: &str = "karabiner-combiner/build_report@1";

/// What one build read and wrote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub schema_version: u32,

    pub schema_id: String,

    /// When the report was created
    pub created_at: DateTime<Utc>,

    /// Number of rules in the merged document, including any already in the body
    pub rule_count: usize,

    /// Files read, body first
    pub sources: Vec<LoadedSource>,

    /// Destinations written, in order
    pub outputs: Vec<SavedOutput>,

    /// True when the merged document was printed instead of written
    pub dry_run: bool,
}

impl BuildReport {
    pub fn new(combiner: &Combiner, outputs: Vec<SavedOutput>) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            schema_id: REPORT_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            rule_count: combiner.rules().len(),
            sources: combiner.sources().to_vec(),
            outputs,
            dry_run: false,
        }
    }

    pub fn dry_run(combiner: &Combiner) -> Self {
        Self {
            dry_run: true,
            ..Self::new(combiner, Vec::new())
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary
    pub fn to_human(&self) -> String {
        let mut out = format!(
            "Combined {} rule file(s) into {} rule(s)\n",
            self.sources.len().saturating_sub(1),
            self.rule_count
        );
        for output in &self.outputs {
            out.push_str(&format!(
                "  wrote {} ({} bytes)\n",
                output.path.display(),
                output.bytes
            ));
        }
        out
    }
}
