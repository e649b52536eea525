//! Publishing the export history to a remote

use tempfile::TempDir;

use conf_replay::exporter::PathLocator;
use conf_replay::models::{ReplayMode, RunIdentity};
use conf_replay::process::SystemRunner;
use conf_replay::replay::{Publisher, ReplayController};

use super::helpers::{
    commit_files, export_run, git, init_source_repo, replay_options, write_fake_exporter,
};

fn replay_two_commits(
    source: &TempDir,
    scratch: &TempDir,
    tools: &TempDir,
) -> conf_replay::replay::Replayed {
    let root = source.path();
    let base = commit_files(root, "One", &[("a.conf", "a")], &[]);
    let head = commit_files(root, "Two", &[("a.conf", "b")], &[]);
    let exporter = write_fake_exporter(tools.path());
    ReplayController::new(
        &SystemRunner,
        &PathLocator,
        replay_options(scratch.path(), &exporter),
    )
    .run(&export_run(&base, &head, ReplayMode::Full), root)
    .unwrap()
}

#[test]
fn test_publish_force_pushes_run_branch() {
    let source = init_source_repo();
    let scratch = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let replayed = replay_two_commits(&source, &scratch, &tools);

    let remote = TempDir::new().unwrap();
    git(&["init", "--quiet", "--bare"], remote.path());
    let remote_url = remote.path().to_string_lossy().to_string();
    let identity = RunIdentity::new("export", "1");

    let branch = Publisher::new(&SystemRunner)
        .push_notes(true)
        .publish(replayed.workspace.path(), &remote_url, &identity)
        .unwrap();

    assert_eq!(branch, "export/1");
    assert_eq!(
        git(&["rev-parse", "refs/heads/export/1"], remote.path()),
        replayed.outcome.head_exported.as_str()
    );
    assert!(!git(&["rev-parse", "refs/notes/export-runs/export/1"], remote.path()).is_empty());

    // a second publish of a different history rewrites the branch
    let other_source = init_source_repo();
    let other_scratch = TempDir::new().unwrap();
    let other = replay_two_commits(&other_source, &other_scratch, &tools);
    Publisher::new(&SystemRunner)
        .publish(other.workspace.path(), &remote_url, &identity)
        .unwrap();
    assert_eq!(
        git(&["rev-parse", "refs/heads/export/1"], remote.path()),
        other.outcome.head_exported.as_str()
    );
}

#[test]
fn test_publish_failure_leaves_revisions_intact() {
    let source = init_source_repo();
    let scratch = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let replayed = replay_two_commits(&source, &scratch, &tools);
    let before = replayed.outcome.clone();

    let missing = scratch.path().join("no-such-remote.git");
    let err = Publisher::new(&SystemRunner)
        .publish(
            replayed.workspace.path(),
            &missing.to_string_lossy(),
            &RunIdentity::new("export", "1"),
        )
        .unwrap_err();

    assert!(err.is_publish());
    assert_eq!(replayed.outcome, before);
    assert_eq!(
        git(&["rev-parse", "HEAD"], replayed.workspace.path()),
        before.head_exported.as_str()
    );
}
