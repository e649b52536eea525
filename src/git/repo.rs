//! Git repository handle
//!
//! [`GitRepo`] wraps a working directory and a [`CommandRunner`]. It exposes
//! the history queries and mutations the replay pipeline needs, for both the
//! source repository (read + checkout) and the output repository (index and
//! commit). Errors are raw [`CommandError`]s; callers attach the pipeline stage.

use std::path::{Path, PathBuf};

use crate::error::CommandError;
use crate::models::CommitIdentity;
use crate::process::CommandRunner;

use super::runner::{git, git_with_config};

/// Options for committing an export step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOptions {
    /// Commit even when the tree matches the previous commit
    pub allow_empty: bool,
    /// Skip commit hooks
    pub no_verify: bool,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            allow_empty: true,
            no_verify: true,
        }
    }
}

pub struct GitRepo<'r> {
    root: PathBuf,
    runner: &'r dyn CommandRunner,
}

impl<'r> GitRepo<'r> {
    pub fn new(root: impl Into<PathBuf>, runner: &'r dyn CommandRunner) -> Self {
        Self {
            root: root.into(),
            runner,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<String, CommandError> {
        self.runner.run_checked(&git(args, &self.root))
    }

    /// `git init` in the repository root. The directory must already exist.
    pub fn init(&self) -> Result<(), CommandError> {
        self.run(&["init", "--quiet"])?;
        Ok(())
    }

    /// Resolve any revision expression to a full commit id.
    pub fn resolve_commit(&self, rev: &str) -> Result<String, CommandError> {
        let spec = format!("{rev}^{{commit}}");
        self.run(&["rev-parse", "--verify", spec.as_str()])
    }

    /// Commit id of `HEAD`.
    pub fn head(&self) -> Result<String, CommandError> {
        self.run(&["rev-parse", "HEAD"])
    }

    pub fn merge_base(&self, a: &str, b: &str) -> Result<String, CommandError> {
        self.run(&["merge-base", a, b])
    }

    /// First-parent commits in `]base, head]`, oldest first.
    pub fn first_parent_range(&self, base: &str, head: &str) -> Result<Vec<String>, CommandError> {
        let range = format!("{base}..{head}");
        let stdout = self.run(&["rev-list", "--reverse", "--first-parent", range.as_str()])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// `git log --oneline` summary of a single commit.
    pub fn oneline_summary(&self, commit: &str) -> Result<String, CommandError> {
        self.run(&["log", "--no-decorate", "--oneline", "-1", commit])
    }

    /// Check out `commit` with a detached HEAD, discarding local modifications.
    pub fn checkout_detached(&self, commit: &str) -> Result<(), CommandError> {
        self.run(&["checkout", "--quiet", "--force", "--detach", commit])?;
        Ok(())
    }

    /// Remove every tracked file from the index and the working tree.
    /// A no-op on a repository with nothing tracked.
    pub fn remove_all_tracked(&self) -> Result<(), CommandError> {
        self.run(&[
            "rm",
            "--quiet",
            "-r",
            "--force",
            "--ignore-unmatch",
            "--",
            "*",
        ])?;
        Ok(())
    }

    /// Stage the whole working tree, including ignored files.
    pub fn add_all_forced(&self) -> Result<(), CommandError> {
        self.run(&["add", "--all", "--force", "--", "."])?;
        Ok(())
    }

    pub fn commit(
        &self,
        message: &str,
        identity: &CommitIdentity,
        options: CommitOptions,
    ) -> Result<(), CommandError> {
        let mut args = vec!["commit", "--quiet"];
        if options.allow_empty {
            args.push("--allow-empty");
        }
        if options.no_verify {
            args.push("--no-verify");
        }
        args.extend(["-m", message]);

        let mut config = identity.git_config_args();
        config.extend(["-c".to_string(), "commit.gpgsign=false".to_string()]);
        self.runner
            .run_checked(&git_with_config(&config, &args, &self.root))?;
        Ok(())
    }

    /// Attach (or replace) a note on `rev` under `notes_ref`.
    pub fn add_note(
        &self,
        notes_ref: &str,
        rev: &str,
        message: &str,
        identity: &CommitIdentity,
    ) -> Result<(), CommandError> {
        let ref_arg = format!("--ref={notes_ref}");
        let args = ["notes", ref_arg.as_str(), "add", "--force", "-m", message, rev];
        self.runner.run_checked(&git_with_config(
            &identity.git_config_args(),
            &args,
            &self.root,
        ))?;
        Ok(())
    }

    /// `git push --force <remote> <refspec>...`
    pub fn push_force(&self, remote: &str, refspecs: &[String]) -> Result<(), CommandError> {
        let mut args = vec!["push".to_string(), "--force".to_string(), remote.to_string()];
        args.extend(refspecs.iter().cloned());
        self.run(&args)?;
        Ok(())
    }
}
