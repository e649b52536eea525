//! Shared test helpers for replay integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use conf_replay::exporter::{InterpreterCandidate, InterpreterResolver};
use conf_replay::models::{ExportRun, ReplayMode, RunIdentity};
use conf_replay::replay::ReplayOptions;

/// Run git in `dir` and return trimmed stdout, panicking on failure.
pub fn git(args: &[&str], dir: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Test helper: Create a temporary source repository on branch `main`
/// with no commits
pub fn init_source_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let repo_root = temp_dir.path();

    git(&["init", "--quiet"], repo_root);
    git(&["config", "user.email", "test@test.com"], repo_root);
    git(&["config", "user.name", "Test User"], repo_root);
    git(&["config", "commit.gpgsign", "false"], repo_root);
    git(&["checkout", "--quiet", "-b", "main"], repo_root);

    temp_dir
}

/// Test helper: Write files, remove files, commit everything, return the id
pub fn commit_files(
    repo_root: &Path,
    message: &str,
    write: &[(&str, &str)],
    remove: &[&str],
) -> String {
    for (name, content) in write {
        fs::write(repo_root.join(name), content).expect("Failed to write file");
    }
    for name in remove {
        fs::remove_file(repo_root.join(name)).expect("Failed to remove file");
    }
    git(&["add", "--all", "."], repo_root);
    git(&["commit", "--quiet", "--allow-empty", "-m", message], repo_root);
    git(&["rev-parse", "HEAD"], repo_root)
}

/// `git log --oneline` summary, as the pipeline reads it
pub fn oneline(repo_root: &Path, commit: &str) -> String {
    git(&["log", "--no-decorate", "--oneline", "-1", commit], repo_root)
}

/// Test helper: Write a stand-in exporter interpreter.
///
/// It upper-cases every `*.conf` file of the working directory into
/// `<name>.out` under the `-o` directory, and exits 3 when a `FAIL` file is
/// present.
pub fn write_fake_exporter(dir: &Path) -> PathBuf {
    let script = dir.join("fake-python");
    fs::write(
        &script,
        r#"#!/bin/sh
set -e
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; shift; fi
  shift
done
[ -n "$out" ] || exit 2
if [ -e FAIL ]; then
  echo "export failed" >&2
  exit 3
fi
for f in *.conf; do
  [ -e "$f" ] || continue
  tr 'a-z' 'A-Z' < "$f" > "$out/${f%.conf}.out"
done
exit 0
"#,
    )
    .expect("Failed to write fake exporter");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake exporter executable");
    }

    script
}

/// Replay options pointing at a scratch root and the fake exporter.
/// The first interpreter candidate never resolves, so the fallback is used.
pub fn replay_options(scratch_root: &Path, exporter: &Path) -> ReplayOptions {
    ReplayOptions {
        scratch_root: scratch_root.to_path_buf(),
        interpreters: InterpreterResolver::new(vec![
            InterpreterCandidate::Named("conf-replay-missing-python".to_string()),
            InterpreterCandidate::Path(exporter.to_path_buf()),
        ]),
        ..ReplayOptions::default()
    }
}

pub fn export_run(base: &str, head: &str, mode: ReplayMode) -> ExportRun {
    ExportRun {
        base: base.to_string(),
        head: head.to_string(),
        mode,
        output_remote: None,
        identity: RunIdentity::new("export", "1"),
        actor: "octocat".to_string(),
    }
}

/// Files tracked at `HEAD` of `repo_root`, sorted
pub fn tracked_files(repo_root: &Path) -> Vec<String> {
    let listing = git(&["ls-tree", "-r", "--name-only", "HEAD"], repo_root);
    let mut files: Vec<String> = listing
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    files.sort();
    files
}

/// Subjects of the first-parent history of `HEAD`, oldest first
pub fn subjects(repo_root: &Path) -> Vec<String> {
    git(&["log", "--reverse", "--format=%s", "HEAD"], repo_root)
        .lines()
        .map(String::from)
        .collect()
}
