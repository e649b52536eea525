use anyhow::Result;
use conf_replay::commands::{clean, plan, run};

use super::types::Commands;

pub fn dispatch(command: Commands, config: Option<std::path::PathBuf>) -> Result<()> {
    match command {
        Commands::Run {
            range,
            job,
            run_number,
            actor,
            remote,
            scratch_root,
            interpreter,
            cleanup,
            github_output,
            json,
            ignore_publish_failure,
        } => run::execute(run::RunArgs {
            source: range.source,
            base: range.base,
            head: range.head,
            fast: range.fast,
            remote,
            job,
            run_number,
            actor,
            config,
            scratch_root,
            interpreter,
            cleanup,
            skip_preflight: range.skip_preflight,
            github_output,
            json,
            ignore_publish_failure,
        }),
        Commands::Plan { range } => plan::execute(
            &range.source,
            &range.base,
            &range.head,
            range.fast,
            range.skip_preflight,
        ),
        Commands::Clean {
            job,
            run_number,
            scratch_root,
        } => clean::execute(&job, &run_number, config.as_deref(), scratch_root),
    }
}
