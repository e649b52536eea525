use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How much of the source range gets replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplayMode {
    /// One export per first-parent commit between base and head
    Full,
    /// Only the head commit is exported after the base
    Fast,
}

impl ReplayMode {
    pub fn from_fast_flag(fast: bool) -> Self {
        if fast {
            ReplayMode::Fast
        } else {
            ReplayMode::Full
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplayMode::Full => "full",
            ReplayMode::Fast => "fast",
        }
    }
}

impl fmt::Display for ReplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the CI job that triggered the run. Namespaces both the scratch
/// workspace on disk and the published branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    pub job: String,
    pub run_number: String,
}

impl RunIdentity {
    pub fn new(job: impl Into<String>, run_number: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            run_number: run_number.into(),
        }
    }

    /// `<job>/<run-number>`
    pub fn branch_name(&self) -> String {
        format!("{}/{}", self.job, self.run_number)
    }

    /// Scratch workspace path: `<scratch_root>/<job>/<run-number>`
    pub fn workspace_path(&self, scratch_root: &Path) -> PathBuf {
        scratch_root.join(&self.job).join(&self.run_number)
    }
}

/// One invocation of the pipeline. Everything the core needs is carried here;
/// nothing is read from ambient process state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRun {
    pub base: String,
    pub head: String,
    pub mode: ReplayMode,
    pub output_remote: Option<String>,
    pub identity: RunIdentity,
    pub actor: String,
}
