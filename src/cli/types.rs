use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "conf-replay")]
#[command(
    about = "Replay a commit range through the configuration exporter into an export repository",
    long_about = None
)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Settings file (defaults to ./conf-replay.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Source repository and commit range shared by `run` and `plan`
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// Path to the checked-out source repository
    #[arg(long, default_value = ".")]
    pub source: PathBuf,

    /// Base commit (start of the range, exported first)
    #[arg(long)]
    pub base: String,

    /// Head commit (end of the range)
    #[arg(long)]
    pub head: String,

    /// Export only base and head, skipping intermediate commits
    #[arg(long)]
    pub fast: bool,

    /// Do not check that base is the merge-base of base and head
    #[arg(long)]
    pub skip_preflight: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export every commit of the range and optionally publish the result
    Run {
        #[command(flatten)]
        range: RangeArgs,

        /// Job name; namespaces the workspace and published branch
        #[arg(long, env = "GITHUB_JOB")]
        job: String,

        /// Run number; namespaces the workspace and published branch
        #[arg(long, env = "GITHUB_RUN_NUMBER")]
        run_number: String,

        /// Name the exported commits are attributed to
        #[arg(long, env = "GITHUB_ACTOR")]
        actor: String,

        /// Remote to force-push the export history to (branch <job>/<run-number>)
        #[arg(long)]
        remote: Option<String>,

        /// Root directory for output workspaces
        #[arg(long)]
        scratch_root: Option<PathBuf>,

        /// Exporter interpreter, tried before the configured names
        #[arg(long)]
        interpreter: Option<PathBuf>,

        /// Remove the output workspace when the run ends, including failed runs
        #[arg(long)]
        cleanup: bool,

        /// Append base-exported-sha / head-exported-sha to this file
        #[arg(long, env = "GITHUB_OUTPUT")]
        github_output: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Exit successfully even if publishing fails
        #[arg(long)]
        ignore_publish_failure: bool,
    },

    /// Show the commits a run would export
    Plan {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Remove the output workspace of a run
    Clean {
        #[arg(long, env = "GITHUB_JOB")]
        job: String,

        #[arg(long, env = "GITHUB_RUN_NUMBER")]
        run_number: String,

        /// Root directory for output workspaces
        #[arg(long)]
        scratch_root: Option<PathBuf>,
    },
}
