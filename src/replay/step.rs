//! Export step execution
//!
//! One step materializes one source commit into one output commit:
//!
//! 1. resolve the exporter interpreter
//! 2. detached checkout of the commit in the source repository
//! 3. remove every tracked file from the output repository
//! 4. run the exporter into the output root
//! 5. stage everything (forced) and commit with the source summary
//!
//! Each stage finishes before the next starts. Any failure aborts the step.

use tracing::{debug, info, info_span};

use crate::error::{ExportError, ExportResult};
use crate::exporter::{ExporterSettings, InterpreterResolver, ProgramLocator};
use crate::git::{CommitOptions, GitRepo};
use crate::models::{escape_message, CommitIdentity, ExportedRevision, ReplayMode, StepRecord};
use crate::process::CommandRunner;

use super::workspace::OutputWorkspace;

/// Notes ref recording how each output commit was produced.
pub const EXPORT_NOTES_REF: &str = "refs/notes/export";

pub struct StepExecutor<'a> {
    runner: &'a dyn CommandRunner,
    locator: &'a dyn ProgramLocator,
    interpreters: InterpreterResolver,
    exporter: ExporterSettings,
    identity: CommitIdentity,
    commit_options: CommitOptions,
    /// Annotate output commits with the replay mode when set
    annotate: Option<ReplayMode>,
}

impl<'a> StepExecutor<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        locator: &'a dyn ProgramLocator,
        interpreters: InterpreterResolver,
        exporter: ExporterSettings,
        identity: CommitIdentity,
    ) -> Self {
        Self {
            runner,
            locator,
            interpreters,
            exporter,
            identity,
            commit_options: CommitOptions::default(),
            annotate: None,
        }
    }

    pub fn commit_options(mut self, options: CommitOptions) -> Self {
        self.commit_options = options;
        self
    }

    pub fn annotate(mut self, mode: Option<ReplayMode>) -> Self {
        self.annotate = mode;
        self
    }

    /// Export `commit` from `source` into `output` and commit the result.
    ///
    /// Always adds exactly one commit to the output history, even when the
    /// exported tree did not change.
    pub fn export_at(
        &self,
        commit: &str,
        source: &GitRepo<'_>,
        output: &OutputWorkspace,
    ) -> ExportResult<StepRecord> {
        let _span = info_span!("export_step", commit = %commit).entered();

        // Fail before spawning anything if no interpreter can run the exporter
        let interpreter = self.interpreters.resolve(self.locator)?;

        let checkout_error = |source| ExportError::Checkout {
            commit: commit.to_string(),
            source,
        };
        let commit_error = |source| ExportError::Commit {
            commit: commit.to_string(),
            source,
        };

        source.checkout_detached(commit).map_err(checkout_error)?;
        let summary = source.oneline_summary(commit).map_err(checkout_error)?;
        debug!(%summary, "checked out source commit");

        let out = output.repo(self.runner);
        out.remove_all_tracked().map_err(commit_error)?;

        let export = self
            .exporter
            .command(&interpreter, source.root(), output.path());
        self.runner
            .run_checked(&export)
            .map_err(|source| ExportError::Exporter {
                commit: commit.to_string(),
                source,
            })?;

        out.add_all_forced().map_err(commit_error)?;
        out.commit(&escape_message(&summary), &self.identity, self.commit_options)
            .map_err(commit_error)?;
        let exported = out.head().map_err(commit_error)?;

        if let Some(mode) = self.annotate {
            let note = format!("Export-Mode: {mode}\nSource-Commit: {commit}\n");
            out.add_note(EXPORT_NOTES_REF, &exported, &note, &self.identity)
                .map_err(commit_error)?;
        }

        info!(exported = %exported, "exported {summary}");
        Ok(StepRecord {
            source_commit: commit.to_string(),
            summary,
            exported: ExportedRevision(exported),
        })
    }
}
