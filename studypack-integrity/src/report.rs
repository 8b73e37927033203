use serde::Serialize;

use crate::validate::RemovalRecord;

/// Issues of one export run, in the two shapes the reports are written in:
/// a flat list of issue strings, and each removed entity with its own issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueReport {
    pub issues: Vec<String>,
    pub detailed: Vec<RemovalRecord>,
}

impl IssueReport {
    pub fn from_removed(removed: &[RemovalRecord]) -> Self {
        Self {
            issues: removed.iter().flat_map(|r| r.issues.iter().cloned()).collect(),
            detailed: removed.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// The flat report, pretty-printed.
    pub fn issues_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.issues)
    }

    /// The detailed report, pretty-printed.
    pub fn detailed_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.detailed)
    }
}
