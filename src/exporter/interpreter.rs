//! Exporter interpreter resolution
//!
//! The exporter runs under an interpreter found by trying an ordered list of
//! candidates. The first candidate that resolves wins; running out of
//! candidates is [`ExportError::InterpreterNotFound`].

use std::path::PathBuf;

use tracing::debug;

use crate::error::{ExportError, ExportResult};

/// Finds an executable program on the host.
pub trait ProgramLocator {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Looks programs up on `PATH` (or checks an explicit path) with `which`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathLocator;

impl ProgramLocator for PathLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// One way of finding the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterCandidate {
    /// Search `PATH` for a program name
    Named(String),
    /// Use an explicit path if it exists and is executable
    Path(PathBuf),
}

impl InterpreterCandidate {
    pub fn label(&self) -> String {
        match self {
            InterpreterCandidate::Named(name) => name.clone(),
            InterpreterCandidate::Path(path) => path.display().to_string(),
        }
    }

    fn resolve(&self, locator: &dyn ProgramLocator) -> Option<PathBuf> {
        match self {
            InterpreterCandidate::Named(name) => locator.locate(name),
            InterpreterCandidate::Path(path) => locator.locate(&path.to_string_lossy()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterResolver {
    candidates: Vec<InterpreterCandidate>,
}

impl Default for InterpreterResolver {
    /// `python2`, falling back to `python`
    fn default() -> Self {
        Self::from_names(&["python2", "python"])
    }
}

impl InterpreterResolver {
    pub fn new(candidates: Vec<InterpreterCandidate>) -> Self {
        Self { candidates }
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(
            names
                .iter()
                .map(|n| InterpreterCandidate::Named(n.as_ref().to_string()))
                .collect(),
        )
    }

    /// Try `path` before every other candidate.
    pub fn with_explicit_path(mut self, path: PathBuf) -> Self {
        self.candidates.insert(0, InterpreterCandidate::Path(path));
        self
    }

    pub fn candidates(&self) -> &[InterpreterCandidate] {
        &self.candidates
    }

    pub fn resolve(&self, locator: &dyn ProgramLocator) -> ExportResult<PathBuf> {
        for candidate in &self.candidates {
            match candidate.resolve(locator) {
                Some(path) => {
                    debug!(
                        candidate = %candidate.label(),
                        path = %path.display(),
                        "resolved exporter interpreter"
                    );
                    return Ok(path);
                }
                None => debug!(candidate = %candidate.label(), "interpreter candidate unavailable"),
            }
        }

        Err(ExportError::InterpreterNotFound {
            tried: self.candidates.iter().map(InterpreterCandidate::label).collect(),
        })
    }
}
