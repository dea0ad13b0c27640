//! Child entry point: `simbatch task <category> <count>`.
//!
//! Exit codes: 0 on success (artifact path on stdout), 1 when the artifact
//! cannot be written, 2 on invalid arguments.
use std::{path::PathBuf, process::ExitCode, sync::Arc};

use simbatch_core::{clock::SystemClock, runner::BuildContext, simulation::simulate};
use simbatch_exec::{CHILD_EXIT_INPUT, CHILD_EXIT_IO, EXCLUSIVE_ENV, SEED_ENV};
use simbatch_model::EntryArgs;
use time::UtcOffset;
use tracing::{error, info, warn};

pub fn execute(args: &[String], offset: UtcOffset) -> ExitCode {
    let entry = match EntryArgs::parse(args) {
        Ok(entry) => entry,
        Err(e) => {
            error!(args = ?args, "invalid task arguments: {e}");
            eprintln!("simbatch task: {e}");
            return ExitCode::from(CHILD_EXIT_INPUT);
        }
    };

    let spec = entry.to_spec();
    let output_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = BuildContext::new(output_dir, Arc::new(SystemClock::new(offset)))
        .with_seed(seed_from_env())
        .with_exclusive_artifacts(std::env::var(EXCLUSIVE_ENV).is_ok_and(|v| v == "1"));

    info!(category = %entry.category, count = entry.count, "task started");
    match simulate(&spec, &ctx, spec.strategy.work_profile(ctx.max_sleep_ms())) {
        Ok((path, result)) => {
            info!(artifact = %path.display(), duration = %result.duration(), "task completed");
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("task failed: {e}");
            eprintln!("simbatch task: {e}");
            ExitCode::from(CHILD_EXIT_IO)
        }
    }
}

fn seed_from_env() -> Option<u64> {
    let raw = std::env::var(SEED_ENV).ok()?;
    match raw.parse() {
        Ok(seed) => Some(seed),
        Err(_) => {
            warn!(value = %raw, "ignoring malformed {SEED_ENV}");
            None
        }
    }
}
