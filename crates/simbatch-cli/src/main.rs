mod cli;
mod run;
mod task;

use std::process::ExitCode;

use clap::Parser;
use simbatch_observe::{init_local_offset, init_logger};
use tracing::debug;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<ExitCode> {
    // Must run before any thread exists.
    let offset = init_local_offset();

    let cli = Cli::parse();
    init_logger(&cli.logger_config())?;
    debug!(%offset, "logger initialized");

    let child_args = cli.child_args();
    match cli.command {
        Command::Task { args } => Ok(task::execute(&args, offset)),
        Command::Run(args) => run::execute(args, child_args, offset),
    }
}
