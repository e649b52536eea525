use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::run::ReplayMode;

/// Commit id produced in the output repository by one export step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportedRevision(pub String);

impl ExportedRevision {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExportedRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One replayed source commit and the output commit it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub source_commit: String,
    pub summary: String,
    pub exported: ExportedRevision,
}

/// What the replay controller hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub base_exported: ExportedRevision,
    pub head_exported: ExportedRevision,
    /// Base step first, then every replayed commit in order
    pub steps: Vec<StepRecord>,
}

impl ReplayOutcome {
    /// Informational line combining both revisions.
    pub fn summary_line(&self) -> String {
        format!(
            "Exported base configuration as {} and head configuration as {}",
            self.base_exported, self.head_exported
        )
    }

    /// `key=value` lines in the CI step-output format.
    pub fn output_lines(&self) -> String {
        format!(
            "base-exported-sha={}\nhead-exported-sha={}\n",
            self.base_exported, self.head_exported
        )
    }
}

/// Full machine-readable report of a run, printed with `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub mode: ReplayMode,
    pub base: String,
    pub head: String,
    pub outcome: ReplayOutcome,
    pub published_branch: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
