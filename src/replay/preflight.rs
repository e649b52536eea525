//! Checks run before anything is exported
//!
//! The replay core assumes `base` is an ancestor of `head` and that the run
//! identity is usable as a path and branch name. Violations are reported as
//! [`ExportError::Precondition`] before the workspace is touched.

use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::git::GitRepo;
use crate::models::{ExportRun, RunIdentity};

/// Base and head resolved to full commit ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    pub base: String,
    pub head: String,
}

/// Validate the run identity and actor.
pub fn validate_run(run: &ExportRun) -> ExportResult<()> {
    if run.actor.trim().is_empty() {
        return Err(ExportError::Precondition(
            "actor is empty; it is needed to attribute exported commits".to_string(),
        ));
    }

    validate_identity(&run.identity)
}

/// Require job and run number to be single, non-traversing path components.
pub fn validate_identity(identity: &RunIdentity) -> ExportResult<()> {
    for (name, value) in [("job", &identity.job), ("run number", &identity.run_number)] {
        if !is_safe_component(value) {
            return Err(ExportError::Precondition(format!(
                "{name} '{value}' cannot be used in a workspace path or branch name"
            )));
        }
    }
    Ok(())
}

fn is_safe_component(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Resolve `base` and `head` and require `base` to be their merge-base.
pub fn check_range(source: &GitRepo<'_>, base: &str, head: &str) -> ExportResult<ResolvedRange> {
    let resolve = |label: &str, rev: &str| {
        source.resolve_commit(rev).map_err(|e| {
            ExportError::Precondition(format!("cannot resolve {label} '{rev}': {e}"))
        })
    };
    let base = resolve("base", base)?;
    let head = resolve("head", head)?;

    let merge_base = source.merge_base(&base, &head).map_err(|e| {
        ExportError::Precondition(format!("no merge-base between {base} and {head}: {e}"))
    })?;

    if merge_base != base {
        return Err(ExportError::Precondition(format!(
            "merge-base between base ({base}) and head ({head}) is {merge_base}, not base; \
             rebase the head branch onto base"
        )));
    }

    debug!(%base, %head, "range validated");
    Ok(ResolvedRange { base, head })
}
