//! External command execution
//!
//! Every external program the pipeline touches (git, the exporter interpreter)
//! is described by a [`CommandSpec`] and executed through the [`CommandRunner`]
//! trait. Production code uses [`SystemRunner`]; tests substitute
//! [`RecordingRunner`] to capture invocations and return canned output.

pub mod recording;

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::CommandError;

pub use recording::{RecordingRunner, ScriptedResponse};

/// A fully described invocation of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Exit codes treated as success. Defaults to `[0]`.
    pub expected_exit_codes: Vec<i32>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
            expected_exit_codes: vec![0],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn expect_exit_codes(mut self, codes: &[i32]) -> Self {
        self.expected_exit_codes = codes.to_vec();
        self
    }

    /// Shell-escaped rendering of the command, for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| shell_escape::escape(part.as_str().into()).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn accepts(&self, code: Option<i32>) -> bool {
        code.is_some_and(|c| self.expected_exit_codes.contains(&c))
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// The single capability the pipeline needs from the host: run a command to
/// completion.
pub trait CommandRunner {
    /// Run the command and capture its output. Only spawn failures are errors
    /// here; exit status is left to the caller.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;

    /// Run the command and fail unless it exits with an expected code.
    /// Returns trimmed stdout.
    fn run_checked(&self, spec: &CommandSpec) -> Result<String, CommandError> {
        let output = self.run(spec)?;
        if !spec.accepts(output.code) {
            return Err(CommandError::UnexpectedExit {
                command_line: spec.command_line(),
                code: output.code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout.trim().to_string())
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        (**self).run(spec)
    }
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        debug!(cwd = %spec.cwd.display(), "running {}", spec.command_line());

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .output()
            .map_err(|source| CommandError::Spawn {
                command_line: spec.command_line(),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
