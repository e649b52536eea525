//! Settings file
//!
//! Optional TOML file, `conf-replay.toml` in the working directory unless a
//! path is given. Every key has a default so an absent file is valid.
//!
//! ```toml
//! [workspace]
//! scratch_root = "/tmp"
//! cleanup = false
//!
//! [exporter]
//! module = "administration.master_config_utils"
//! interpreters = ["python2", "python"]
//! interpreter_path = "/opt/python2/bin/python"
//! extra_args = []
//!
//! [commit]
//! email_domain = "noreply.com"
//! annotate = true
//!
//! [publish]
//! push_notes = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::exporter::{ExporterSettings, InterpreterResolver, DEFAULT_EXPORT_MODULE};
use crate::git::CommitOptions;
use crate::replay::ReplayOptions;

pub const DEFAULT_CONFIG_FILE: &str = "conf-replay.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub workspace: WorkspaceSettings,
    pub exporter: ExporterSection,
    pub commit: CommitSection,
    pub publish: PublishSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceSettings {
    /// Output workspaces live at `<scratch_root>/<job>/<run-number>`
    pub scratch_root: PathBuf,
    /// Remove the output workspace when the run ends
    pub cleanup: bool,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            scratch_root: PathBuf::from("/tmp"),
            cleanup: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExporterSection {
    pub module: String,
    /// Interpreter names tried in order on `PATH`
    pub interpreters: Vec<String>,
    /// Tried before `interpreters` when set
    pub interpreter_path: Option<PathBuf>,
    pub extra_args: Vec<String>,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            module: DEFAULT_EXPORT_MODULE.to_string(),
            interpreters: vec!["python2".to_string(), "python".to_string()],
            interpreter_path: None,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitSection {
    pub email_domain: String,
    /// Attach `Export-Mode` / `Source-Commit` notes to output commits
    pub annotate: bool,
}

impl Default for CommitSection {
    fn default() -> Self {
        Self {
            email_domain: "noreply.com".to_string(),
            annotate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishSection {
    pub push_notes: bool,
}

impl Default for PublishSection {
    fn default() -> Self {
        Self { push_notes: true }
    }
}

impl Settings {
    /// Load settings from `path`, or from [`DEFAULT_CONFIG_FILE`] in `cwd` if
    /// it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>, cwd: &Path) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = cwd.join(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.exporter.module.trim().is_empty() {
            bail!("exporter.module must not be empty");
        }
        if self.exporter.interpreters.is_empty() && self.exporter.interpreter_path.is_none() {
            bail!("exporter.interpreters is empty and no exporter.interpreter_path is set");
        }
        if self.commit.email_domain.trim().is_empty() {
            bail!("commit.email_domain must not be empty");
        }
        Ok(())
    }

    pub fn interpreter_resolver(&self) -> InterpreterResolver {
        let resolver = InterpreterResolver::from_names(&self.exporter.interpreters);
        match &self.exporter.interpreter_path {
            Some(path) => resolver.with_explicit_path(path.clone()),
            None => resolver,
        }
    }

    pub fn replay_options(&self) -> ReplayOptions {
        ReplayOptions {
            scratch_root: self.workspace.scratch_root.clone(),
            interpreters: self.interpreter_resolver(),
            exporter: ExporterSettings {
                module: self.exporter.module.clone(),
                extra_args: self.exporter.extra_args.clone(),
            },
            email_domain: self.commit.email_domain.clone(),
            commit: CommitOptions::default(),
            annotate: self.commit.annotate,
            cleanup: self.workspace.cleanup,
        }
    }
}
