//! Output workspace lifecycle
//!
//! The output repository lives at a scratch path namespaced by job and run
//! number. It is always created from scratch: anything already at the path is
//! removed first, so a retried run never sees leftovers of an earlier one.
//!
//! Release is best-effort. When cleanup is requested the directory is removed
//! on drop and failures are logged, never returned.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ExportError, ExportResult};
use crate::git::GitRepo;
use crate::process::CommandRunner;

#[derive(Debug)]
pub struct OutputWorkspace {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl OutputWorkspace {
    /// Wipe `path`, recreate it and initialize an empty repository there.
    pub fn initialize(path: &Path, runner: &dyn CommandRunner) -> ExportResult<Self> {
        let workspace_error = |source: io::Error| ExportError::Workspace {
            path: path.to_path_buf(),
            source,
        };

        // symlink_metadata so a dangling symlink is also cleared
        if fs::symlink_metadata(path).is_ok() {
            info!(path = %path.display(), "removing stale output workspace");
            remove_path(path).map_err(workspace_error)?;
        }

        fs::create_dir_all(path).map_err(workspace_error)?;

        GitRepo::new(path, runner)
            .init()
            .map_err(|err| workspace_error(io::Error::other(err)))?;

        debug!(path = %path.display(), "initialized output workspace");
        Ok(Self {
            path: path.to_path_buf(),
            cleanup_on_drop: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repo<'r>(&self, runner: &'r dyn CommandRunner) -> GitRepo<'r> {
        GitRepo::new(&self.path, runner)
    }

    /// Remove the workspace directory when this handle is dropped.
    pub fn remove_on_drop(mut self, remove: bool) -> Self {
        self.cleanup_on_drop = remove;
        self
    }
}

impl Drop for OutputWorkspace {
    fn drop(&mut self) {
        if self.cleanup_on_drop {
            remove_best_effort(&self.path);
        }
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Remove a workspace directory, logging instead of failing.
///
/// Returns true if something was removed.
pub fn remove_best_effort(path: &Path) -> bool {
    if fs::symlink_metadata(path).is_err() {
        return false;
    }

    match remove_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed output workspace");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), "failed to remove output workspace: {e}");
            false
        }
    }
}
