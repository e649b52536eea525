mod cli;

use anyhow::Result;
use clap::Parser;

use cli::dispatch::dispatch;
use cli::types::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    conf_replay::logging::init(cli.verbose);
    dispatch(cli.command, cli.config)
}
