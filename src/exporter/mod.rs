//! The external exporter
//!
//! The exporter is an opaque program that evaluates a source tree and writes
//! the materialized configuration tree to an output directory:
//!
//! ```text
//! <interpreter> -m <module> export --skip-check --tree -o <output-dir>
//! ```
//!
//! It runs with the source tree as working directory and must exit zero.

pub mod interpreter;

use std::path::Path;

use crate::process::CommandSpec;

pub use interpreter::{InterpreterCandidate, InterpreterResolver, PathLocator, ProgramLocator};

pub const DEFAULT_EXPORT_MODULE: &str = "administration.master_config_utils";

/// How to invoke the exporter, minus the interpreter which is resolved per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterSettings {
    pub module: String,
    /// Appended after the standard arguments
    pub extra_args: Vec<String>,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            module: DEFAULT_EXPORT_MODULE.to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl ExporterSettings {
    pub fn command(
        &self,
        interpreter: &Path,
        source_root: &Path,
        output_dir: &Path,
    ) -> CommandSpec {
        CommandSpec::new(interpreter.to_string_lossy(), source_root)
            .args([
                "-m",
                self.module.as_str(),
                "export",
                "--skip-check",
                "--tree",
                "-o",
            ])
            .arg(output_dir.to_string_lossy())
            .args(self.extra_args.iter().cloned())
    }
}
