//! Plan command: show which commits a run would export, without exporting
//! Usage: conf-replay plan --source <dir> --base <rev> --head <rev> [--fast]

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::git::GitRepo;
use crate::models::{ReplayMode, SourceCommit};
use crate::process::{CommandRunner, SystemRunner};
use crate::replay::{check_range, resolve};

/// Execute the plan command
pub fn execute(
    source: &Path,
    base: &str,
    head: &str,
    fast: bool,
    skip_preflight: bool,
) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let mode = ReplayMode::from_fast_flag(fast);
    let steps = plan(&SystemRunner, &cwd.join(source), base, head, mode, skip_preflight)?;

    println!(
        "{} {} export steps ({mode} mode)",
        "→".cyan().bold(),
        steps.len()
    );
    for (index, commit) in steps.iter().enumerate() {
        let label = if index == 0 { "base" } else { "replay" };
        println!("  {:>6}  {}", label.dimmed(), commit.summary);
    }
    Ok(())
}

/// Every source commit a run would export: the base first, then the replay list.
pub fn plan(
    runner: &dyn CommandRunner,
    source_root: &Path,
    base: &str,
    head: &str,
    mode: ReplayMode,
    skip_preflight: bool,
) -> Result<Vec<SourceCommit>> {
    let source = GitRepo::new(source_root, runner);
    let (base, head) = if skip_preflight {
        (base.to_string(), head.to_string())
    } else {
        let range = check_range(&source, base, head)?;
        (range.base, range.head)
    };

    let mut ids = vec![base.clone()];
    ids.extend(resolve(&source, &base, &head, mode)?);

    ids.into_iter()
        .map(|id| -> Result<SourceCommit> {
            let summary = source.oneline_summary(&id)?;
            Ok(SourceCommit { id, summary })
        })
        .collect()
}
