//! End-to-end replay against real repositories

use std::fs;

use tempfile::TempDir;

use conf_replay::exporter::PathLocator;
use conf_replay::models::ReplayMode;
use conf_replay::process::SystemRunner;
use conf_replay::replay::{ReplayController, EXPORT_NOTES_REF};
use conf_replay::ExportError;

use super::helpers::{
    commit_files, export_run, git, init_source_repo, oneline, replay_options, subjects,
    tracked_files, write_fake_exporter,
};

/// c1: a + b, c2: change a, c3: drop b, c4: add c
fn linear_history(source: &TempDir) -> Vec<String> {
    let root = source.path();
    vec![
        commit_files(root, "Add a and b", &[("a.conf", "alpha"), ("b.conf", "beta")], &[]),
        commit_files(root, "Change a", &[("a.conf", "alpha two")], &[]),
        commit_files(root, "Drop b", &[], &["b.conf"]),
        commit_files(root, "Add c", &[("c.conf", "gamma")], &[]),
    ]
}

#[test]
fn test_full_replay_mirrors_first_parent_history() {
    let source = init_source_repo();
    let commits = linear_history(&source);
    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let exporter = write_fake_exporter(tools.path());

    let controller = ReplayController::new(
        &SystemRunner,
        &PathLocator,
        replay_options(scratch.path(), &exporter),
    );
    let replayed = controller
        .run(
            &export_run(&commits[0], &commits[3], ReplayMode::Full),
            source.path(),
        )
        .unwrap();

    let out = replayed.workspace.path();
    let expected: Vec<String> = commits.iter().map(|c| oneline(source.path(), c)).collect();
    assert_eq!(subjects(out), expected);
    assert_eq!(replayed.outcome.steps.len(), 4);

    assert_eq!(git(&["rev-parse", "HEAD"], out), replayed.outcome.head_exported.as_str());
    assert_eq!(
        git(&["rev-list", "--max-parents=0", "HEAD"], out),
        replayed.outcome.base_exported.as_str()
    );

    // b.out disappears once b.conf is gone from the source
    assert_eq!(tracked_files(out), vec!["a.out", "c.out"]);
    assert_eq!(fs::read_to_string(out.join("a.out")).unwrap(), "ALPHA TWO");
    assert!(!out.join("b.out").exists());

    let author = git(&["log", "-1", "--format=%an <%ae>"], out);
    assert_eq!(author, "octocat <octocat@noreply.com>");
}

#[test]
fn test_fast_replay_exports_base_and_head_only() {
    let source = init_source_repo();
    let commits = linear_history(&source);
    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let exporter = write_fake_exporter(tools.path());

    let controller = ReplayController::new(
        &SystemRunner,
        &PathLocator,
        replay_options(scratch.path(), &exporter),
    );
    let replayed = controller
        .run(
            &export_run(&commits[0], &commits[3], ReplayMode::Fast),
            source.path(),
        )
        .unwrap();

    let out = replayed.workspace.path();
    assert_eq!(
        subjects(out),
        vec![oneline(source.path(), &commits[0]), oneline(source.path(), &commits[3])]
    );
    assert_eq!(tracked_files(out), vec!["a.out", "c.out"]);

    let notes_ref = format!("--ref={EXPORT_NOTES_REF}");
    let note = git(&["notes", notes_ref.as_str(), "show", "HEAD"], out);
    assert!(note.contains("Export-Mode: fast"));
    assert!(note.contains(&format!("Source-Commit: {}", commits[3])));
}

#[test]
fn test_identical_base_and_head_runs_single_step() {
    let source = init_source_repo();
    let commits = linear_history(&source);
    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let exporter = write_fake_exporter(tools.path());

    let controller = ReplayController::new(
        &SystemRunner,
        &PathLocator,
        replay_options(scratch.path(), &exporter),
    );
    let replayed = controller
        .run(
            &export_run(&commits[1], &commits[1], ReplayMode::Full),
            source.path(),
        )
        .unwrap();

    assert_eq!(replayed.outcome.steps.len(), 1);
    assert_eq!(replayed.outcome.base_exported, replayed.outcome.head_exported);
    assert_eq!(subjects(replayed.workspace.path()).len(), 1);
}

#[test]
fn test_side_branches_collapse_to_merge_commit() {
    let source = init_source_repo();
    let root = source.path();
    let base = commit_files(root, "Base", &[("a.conf", "a")], &[]);

    git(&["checkout", "--quiet", "-b", "side"], root);
    commit_files(root, "Side one", &[("s.conf", "s1")], &[]);
    commit_files(root, "Side two", &[("s.conf", "s2")], &[]);
    git(&["checkout", "--quiet", "main"], root);
    let mainline = commit_files(root, "Main change", &[("a.conf", "a2")], &[]);
    git(&["merge", "--quiet", "--no-ff", "-m", "Merge side", "side"], root);
    let head = git(&["rev-parse", "HEAD"], root);

    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let exporter = write_fake_exporter(tools.path());
    let controller = ReplayController::new(
        &SystemRunner,
        &PathLocator,
        replay_options(scratch.path(), &exporter),
    );
    let replayed = controller
        .run(&export_run(&base, &head, ReplayMode::Full), root)
        .unwrap();

    let replayed_sources: Vec<&str> = replayed
        .outcome
        .steps
        .iter()
        .map(|s| s.source_commit.as_str())
        .collect();
    assert_eq!(replayed_sources, vec![base.as_str(), mainline.as_str(), head.as_str()]);
    assert_eq!(
        tracked_files(replayed.workspace.path()),
        vec!["a.out", "s.out"]
    );
}

#[test]
fn test_unchanged_export_still_commits() {
    let source = init_source_repo();
    let root = source.path();
    let base = commit_files(root, "Config", &[("a.conf", "a")], &[]);
    let head = commit_files(root, "Docs only", &[("README.md", "docs")], &[]);

    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let exporter = write_fake_exporter(tools.path());
    let controller = ReplayController::new(
        &SystemRunner,
        &PathLocator,
        replay_options(scratch.path(), &exporter),
    );
    let replayed = controller
        .run(&export_run(&base, &head, ReplayMode::Full), root)
        .unwrap();

    let out = replayed.workspace.path();
    assert_eq!(subjects(out).len(), 2);
    assert_ne!(replayed.outcome.base_exported, replayed.outcome.head_exported);
    assert_eq!(git(&["diff", "--stat", "HEAD~1", "HEAD"], out), "");
}

#[test]
fn test_quotes_in_summary_are_escaped() {
    let source = init_source_repo();
    let root = source.path();
    let base = commit_files(root, "Say \"hello\"", &[("a.conf", "a")], &[]);

    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let exporter = write_fake_exporter(tools.path());
    let controller = ReplayController::new(
        &SystemRunner,
        &PathLocator,
        replay_options(scratch.path(), &exporter),
    );
    let replayed = controller
        .run(&export_run(&base, &base, ReplayMode::Full), root)
        .unwrap();

    let expected = oneline(root, &base).replace('"', "\\\"");
    assert_eq!(subjects(replayed.workspace.path()), vec![expected]);
}

#[test]
fn test_exporter_failure_aborts_run() {
    let source = init_source_repo();
    let root = source.path();
    let base = commit_files(root, "Good", &[("a.conf", "a")], &[]);
    let broken = commit_files(root, "Broken", &[("FAIL", "")], &[]);
    let head = commit_files(root, "After", &[("b.conf", "b")], &[]);

    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let exporter = write_fake_exporter(tools.path());
    let controller = ReplayController::new(
        &SystemRunner,
        &PathLocator,
        replay_options(scratch.path(), &exporter),
    );
    let err = controller
        .run(&export_run(&base, &head, ReplayMode::Full), root)
        .unwrap_err();

    match err {
        ExportError::Exporter { commit, source } => {
            assert_eq!(commit, broken);
            assert!(source.to_string().contains("export failed"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rerun_starts_from_fresh_workspace() {
    let source = init_source_repo();
    let commits = linear_history(&source);
    let tools = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let exporter = write_fake_exporter(tools.path());
    let controller = ReplayController::new(
        &SystemRunner,
        &PathLocator,
        replay_options(scratch.path(), &exporter),
    );

    let first = controller
        .run(
            &export_run(&commits[0], &commits[3], ReplayMode::Full),
            source.path(),
        )
        .unwrap();
    fs::write(first.workspace.path().join("stray.out"), "stray").unwrap();
    drop(first);

    let second = controller
        .run(
            &export_run(&commits[0], &commits[1], ReplayMode::Full),
            source.path(),
        )
        .unwrap();

    assert_eq!(subjects(second.workspace.path()).len(), 2);
    assert!(!second.workspace.path().join("stray.out").exists());
}
