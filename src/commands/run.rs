//! Run command: preflight, replay, report, publish
//! Usage: conf-replay run --base <rev> --head <rev> --job <job> --run-number <n> --actor <name>

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use tracing::warn;

use crate::config::Settings;
use crate::exporter::{PathLocator, ProgramLocator};
use crate::git::GitRepo;
use crate::models::{ExportReport, ExportRun, ReplayMode, RunIdentity};
use crate::process::{CommandRunner, SystemRunner};
use crate::replay::{check_range, validate_run, Publisher, ReplayController};

/// Arguments of the run command, already merged with environment fallbacks.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub source: PathBuf,
    pub base: String,
    pub head: String,
    pub fast: bool,
    pub remote: Option<String>,
    pub job: String,
    pub run_number: String,
    pub actor: String,
    pub config: Option<PathBuf>,
    pub scratch_root: Option<PathBuf>,
    pub interpreter: Option<PathBuf>,
    pub cleanup: bool,
    pub skip_preflight: bool,
    pub github_output: Option<PathBuf>,
    pub json: bool,
    pub ignore_publish_failure: bool,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunResult {
    pub report: ExportReport,
    pub workspace: PathBuf,
}

/// Execute the run command against the host
pub fn execute(args: RunArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    run_pipeline(&args, &cwd, &SystemRunner, &PathLocator).map(|_| ())
}

/// The run command with its collaborators injected.
///
/// Reported outputs are written before publishing, so a failed push never
/// hides revisions that were already computed.
pub fn run_pipeline(
    args: &RunArgs,
    cwd: &Path,
    runner: &dyn CommandRunner,
    locator: &dyn ProgramLocator,
) -> Result<RunResult> {
    let started_at = Utc::now();
    let settings = load_settings(args, cwd)?;

    let source_root = cwd.join(&args.source);
    let source = GitRepo::new(&source_root, runner);

    let mut run = ExportRun {
        base: args.base.clone(),
        head: args.head.clone(),
        mode: ReplayMode::from_fast_flag(args.fast),
        output_remote: args.remote.clone(),
        identity: RunIdentity::new(&args.job, &args.run_number),
        actor: args.actor.clone(),
    };
    validate_run(&run)?;

    if args.skip_preflight {
        warn!("skipping preflight; base is assumed to be an ancestor of head");
    } else {
        let range = check_range(&source, &run.base, &run.head)?;
        run.base = range.base;
        run.head = range.head;
    }

    let controller = ReplayController::new(runner, locator, settings.replay_options());
    let replayed = controller
        .run(&run, &source_root)
        .context("Export replay failed")?;
    let workspace = replayed.workspace;
    let outcome = replayed.outcome;

    if let Some(path) = &args.github_output {
        append_outputs(path, &outcome.output_lines())?;
    }

    let publish_result = match &run.output_remote {
        Some(remote) => Some(
            Publisher::new(runner)
                .push_notes(settings.publish.push_notes && settings.commit.annotate)
                .publish(workspace.path(), remote, &run.identity),
        ),
        None => None,
    };

    let report = ExportReport {
        mode: run.mode,
        base: run.base.clone(),
        head: run.head.clone(),
        outcome,
        published_branch: publish_result
            .as_ref()
            .and_then(|result| result.as_ref().ok().cloned()),
        started_at,
        finished_at: Utc::now(),
    };
    print_report(&report, workspace.path(), args.json)?;

    match publish_result {
        Some(Err(e)) if args.ignore_publish_failure => {
            warn!("{e}; exported revisions are still valid");
        }
        Some(Err(e)) => return Err(e).context("Publishing exported history failed"),
        _ => {}
    }

    Ok(RunResult {
        report,
        workspace: workspace.path().to_path_buf(),
    })
}

fn load_settings(args: &RunArgs, cwd: &Path) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref(), cwd)?;
    if let Some(root) = &args.scratch_root {
        settings.workspace.scratch_root = root.clone();
    }
    if let Some(path) = &args.interpreter {
        settings.exporter.interpreter_path = Some(path.clone());
    }
    if args.cleanup {
        settings.workspace.cleanup = true;
    }
    // the exporter runs inside the source tree, so its output path must be absolute
    settings.workspace.scratch_root = cwd.join(&settings.workspace.scratch_root);
    Ok(settings)
}

/// Append `key=value` lines to a CI step-output file.
fn append_outputs(path: &Path, lines: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    file.write_all(lines.as_bytes())
        .with_context(|| format!("Failed to write output file {}", path.display()))?;
    Ok(())
}

fn print_report(report: &ExportReport, workspace: &Path, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let outcome = &report.outcome;
    println!(
        "{} {} ({} mode, {} export steps)",
        "✓".green().bold(),
        outcome.summary_line(),
        report.mode,
        outcome.steps.len()
    );
    for step in &outcome.steps {
        println!("  {} {}", step.exported.as_str().dimmed(), step.summary);
    }
    println!("  workspace: {}", workspace.display());
    if let Some(branch) = &report.published_branch {
        println!("  published: {}", branch.cyan());
    }
    print!("{}", outcome.output_lines());
    Ok(())
}
