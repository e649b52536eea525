//! Replay controller
//!
//! Drives a whole [`ExportRun`]: fresh workspace, base export, replay list,
//! one export per listed commit. Strictly sequential; the first failure ends
//! the run.

use std::path::{Path, PathBuf};

use tracing::{info, info_span};

use crate::error::ExportResult;
use crate::exporter::{ExporterSettings, InterpreterResolver, ProgramLocator};
use crate::git::{CommitOptions, GitRepo};
use crate::models::{CommitIdentity, ExportRun, ReplayOutcome};
use crate::process::CommandRunner;

use super::resolver::resolve;
use super::step::StepExecutor;
use super::workspace::OutputWorkspace;

/// Knobs that stay fixed across runs.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub scratch_root: PathBuf,
    pub interpreters: InterpreterResolver,
    pub exporter: ExporterSettings,
    pub email_domain: String,
    pub commit: CommitOptions,
    /// Record the replay mode as a git note on every output commit
    pub annotate: bool,
    /// Remove the output workspace when the returned handle is dropped, or
    /// as soon as the run fails
    pub cleanup: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            scratch_root: PathBuf::from("/tmp"),
            interpreters: InterpreterResolver::default(),
            exporter: ExporterSettings::default(),
            email_domain: "noreply.com".to_string(),
            commit: CommitOptions::default(),
            annotate: true,
            cleanup: false,
        }
    }
}

/// Result of a successful replay: the outcome plus the workspace holding the
/// output history, which the caller may publish.
#[derive(Debug)]
pub struct Replayed {
    pub workspace: OutputWorkspace,
    pub outcome: ReplayOutcome,
}

pub struct ReplayController<'a> {
    runner: &'a dyn CommandRunner,
    locator: &'a dyn ProgramLocator,
    options: ReplayOptions,
}

impl<'a> ReplayController<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        locator: &'a dyn ProgramLocator,
        options: ReplayOptions,
    ) -> Self {
        Self {
            runner,
            locator,
            options,
        }
    }

    pub fn workspace_path(&self, run: &ExportRun) -> PathBuf {
        run.identity.workspace_path(&self.options.scratch_root)
    }

    /// Replay `run` from the source repository at `source_root`.
    ///
    /// Returns the exported revision of the base commit and of the last
    /// replayed commit (the same revision when nothing follows the base).
    pub fn run(&self, run: &ExportRun, source_root: &Path) -> ExportResult<Replayed> {
        let _span = info_span!(
            "replay",
            job = %run.identity.job,
            run_number = %run.identity.run_number,
            mode = %run.mode
        )
        .entered();

        let source = GitRepo::new(source_root, self.runner);
        let workspace = OutputWorkspace::initialize(&self.workspace_path(run), self.runner)?
            .remove_on_drop(self.options.cleanup);

        let executor = StepExecutor::new(
            self.runner,
            self.locator,
            self.options.interpreters.clone(),
            self.options.exporter.clone(),
            CommitIdentity::placeholder(&run.actor, &self.options.email_domain),
        )
        .commit_options(self.options.commit)
        .annotate(self.options.annotate.then_some(run.mode));

        info!(base = %run.base, "exporting base commit");
        let base_step = executor.export_at(&run.base, &source, &workspace)?;
        let base_exported = base_step.exported.clone();

        let commits = resolve(&source, &run.base, &run.head, run.mode)?;
        info!(count = commits.len(), "replaying commits after base");

        let mut steps = Vec::with_capacity(commits.len() + 1);
        steps.push(base_step);
        for (index, commit) in commits.iter().enumerate() {
            info!("replaying commit {}/{}: {commit}", index + 1, commits.len());
            steps.push(executor.export_at(commit, &source, &workspace)?);
        }

        let head_exported = steps
            .last()
            .map(|step| step.exported.clone())
            .unwrap_or_else(|| base_exported.clone());

        let outcome = ReplayOutcome {
            base_exported,
            head_exported,
            steps,
        };
        info!("{}", outcome.summary_line());

        Ok(Replayed { workspace, outcome })
    }
}
