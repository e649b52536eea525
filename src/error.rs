//! Error taxonomy for the export-replay pipeline
//!
//! Every failure in the core is fatal and propagates immediately to the caller
//! with the originating message attached. Variants mirror the stage of the
//! pipeline that failed so callers can tell an export failure from a publish
//! failure.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started at all (missing binary, bad cwd, ...)
    #[error("failed to execute `{command_line}`: {source}")]
    Spawn {
        command_line: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited with a code outside the expected set
    #[error("`{command_line}` exited with {}: {}", display_code(.code), .stderr.trim())]
    UnexpectedExit {
        command_line: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Errors produced by the replay pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Detected before any replay starts; nothing has been exported
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Creating or wiping the output workspace failed
    #[error("workspace error at {}: {source}", .path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Querying source history (rev-list, merge-base, log) failed
    #[error("history query failed: {0}")]
    History(#[source] CommandError),

    /// Detached checkout of a source commit failed
    #[error("checkout of {commit} failed: {source}")]
    Checkout {
        commit: String,
        #[source]
        source: CommandError,
    },

    /// No interpreter candidate could be resolved
    #[error("no exporter interpreter found (tried: {})", .tried.join(", "))]
    InterpreterNotFound { tried: Vec<String> },

    /// The exporter could not be run or exited non-zero
    #[error("exporter failed for {commit}: {source}")]
    Exporter {
        commit: String,
        #[source]
        source: CommandError,
    },

    /// Cleaning, staging, committing or annotating in the output workspace failed
    #[error("commit of export for {commit} failed: {source}")]
    Commit {
        commit: String,
        #[source]
        source: CommandError,
    },

    /// Pushing the output history to the remote failed
    #[error("publish to {remote} failed: {source}")]
    Publish {
        remote: String,
        #[source]
        source: CommandError,
    },
}

impl ExportError {
    /// True when the failure happened while publishing, after all export
    /// steps already succeeded.
    pub fn is_publish(&self) -> bool {
        matches!(self, ExportError::Publish { .. })
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
