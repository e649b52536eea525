//! Clean command: remove a run's scratch workspace
//! Usage: conf-replay clean --job <job> --run-number <n>

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;

use crate::config::Settings;
use crate::models::RunIdentity;
use crate::replay::{remove_best_effort, validate_identity};

/// Execute the clean command
///
/// Job and run number must be plain path components. Removal is
/// best-effort: failures are logged and the command still succeeds.
pub fn execute(
    job: &str,
    run_number: &str,
    config: Option<&Path>,
    scratch_root: Option<PathBuf>,
) -> Result<()> {
    let identity = RunIdentity::new(job, run_number);
    validate_identity(&identity)?;

    let cwd = std::env::current_dir()?;
    let settings = Settings::load(config, &cwd)?;
    let root = scratch_root.unwrap_or(settings.workspace.scratch_root);
    let path = identity.workspace_path(&root);

    if remove_best_effort(&path) {
        println!("{} Removed {}", "✓".green().bold(), path.display());
    } else {
        println!("{} Nothing removed at {}", "─".dimmed(), path.display());
    }
    Ok(())
}
