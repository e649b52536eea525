//! Git command construction
//!
//! Builds [`CommandSpec`]s for git so every call site shares the same program
//! name, working directory handling and config overrides.

use std::path::Path;

use crate::process::CommandSpec;

/// Build a `git <args>` invocation rooted at `repo_root`.
///
/// # Arguments
/// * `args` - Git command arguments (e.g., `&["rev-parse", "HEAD"]`)
/// * `repo_root` - Working directory for the git command
pub fn git<S: AsRef<str>>(args: &[S], repo_root: &Path) -> CommandSpec {
    CommandSpec::new("git", repo_root).args(args.iter().map(|a| a.as_ref().to_string()))
}

/// Build a `git -c k=v ... <args>` invocation.
///
/// Config overrides go before the subcommand, which is where git expects them.
pub fn git_with_config<S: AsRef<str>>(
    config: &[String],
    args: &[S],
    repo_root: &Path,
) -> CommandSpec {
    CommandSpec::new("git", repo_root)
        .args(config.iter().cloned())
        .args(args.iter().map(|a| a.as_ref().to_string()))
}
