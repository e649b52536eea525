//! Publishing the output history
//!
//! The remote branch `<job>/<run-number>` belongs to the pipeline, so it is
//! force-pushed on every run. A push failure is reported as
//! [`ExportError::Publish`] and leaves already computed revisions untouched.

use std::path::Path;

use tracing::info;

use crate::error::{ExportError, ExportResult};
use crate::git::GitRepo;
use crate::models::RunIdentity;
use crate::process::CommandRunner;

use super::step::EXPORT_NOTES_REF;

pub struct Publisher<'a> {
    runner: &'a dyn CommandRunner,
    push_notes: bool,
}

impl<'a> Publisher<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            push_notes: false,
        }
    }

    /// Also push the export notes to `refs/notes/export-runs/<job>/<run-number>`.
    pub fn push_notes(mut self, push_notes: bool) -> Self {
        self.push_notes = push_notes;
        self
    }

    pub fn refspecs(&self, identity: &RunIdentity) -> Vec<String> {
        let branch = identity.branch_name();
        let mut refspecs = vec![format!("HEAD:refs/heads/{branch}")];
        if self.push_notes {
            refspecs.push(format!("{EXPORT_NOTES_REF}:refs/notes/export-runs/{branch}"));
        }
        refspecs
    }

    /// Force-push the workspace `HEAD` to `remote`. Returns the branch name.
    pub fn publish(
        &self,
        workspace: &Path,
        remote: &str,
        identity: &RunIdentity,
    ) -> ExportResult<String> {
        let branch = identity.branch_name();
        info!(%remote, %branch, "publishing exported history");

        GitRepo::new(workspace, self.runner)
            .push_force(remote, &self.refspecs(identity))
            .map_err(|source| ExportError::Publish {
                remote: remote.to_string(),
                source,
            })?;

        Ok(branch)
    }
}
