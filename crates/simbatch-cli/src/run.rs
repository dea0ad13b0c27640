use std::{fmt::Write as _, process::ExitCode, sync::Arc};

use anyhow::Context;
use simbatch_core::{
    batch::{BatchReport, BatchRunner},
    clock::SystemClock,
    router::RunnerRouter,
    runner::BuildContext,
};
use simbatch_exec::{register_builtin_runners, subprocess::SubprocessConfig};
use simbatch_model::Strategy;
use time::UtcOffset;
use tracing::{info, warn};

use crate::cli::RunArgs;

/// Run the requested batches one after another and print their reports.
///
/// Exits non-zero when any task of any batch failed.
pub fn execute(args: RunArgs, child_args: Vec<String>, offset: UtcOffset) -> anyhow::Result<ExitCode> {
    let counts = args.counts()?;
    let config = args.batch_config()?;
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output dir {}", config.output_dir.display()))?;
    let output_dir = config.output_dir.clone();

    let exe = std::env::current_exe().context("locating the simbatch executable")?;
    let subprocess = SubprocessConfig::new(exe).with_leading_args(child_args);

    let ctx = BuildContext::from_config(&config, Arc::new(SystemClock::new(offset)));
    let mut router = RunnerRouter::new().with_context(ctx);
    register_builtin_runners(&mut router, subprocess)?;
    let runner = BatchRunner::new(router, config)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    let reports = rt.block_on(async {
        let cancel = runner.cancel_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; canceling running tasks");
                cancel.cancel();
            }
        });

        let mut reports = Vec::new();
        for strategy in args.strategies() {
            if !args.json {
                println!("{}", start_line(strategy, counts.total()));
            }
            let report = runner.run_batch(strategy, &counts).await?;
            if !args.json {
                print!("{}", summary(&report));
            }
            reports.push(report);
        }
        Ok::<_, anyhow::Error>(reports)
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("Check the created files in {}.", output_dir.display());
    }

    let ok = reports.iter().all(BatchReport::is_success);
    info!(batches = reports.len(), ok, "run finished");
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn title(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Process => "Process",
        Strategy::Thread => "Thread",
    }
}

fn start_line(strategy: Strategy, tasks: usize) -> String {
    format!("Starting {} batch ({tasks} tasks)...", strategy.as_str())
}

fn summary(report: &BatchReport) -> String {
    let mut out = format!(
        "{} batch completed in {:.3} seconds ({}/{} succeeded)\n",
        title(report.strategy),
        report.elapsed().as_secs_f64(),
        report.succeeded,
        report.launched,
    );
    for failure in &report.failures {
        let _ = writeln!(
            out,
            "  {} [{}]: {}",
            failure.label,
            failure.run_id.as_deref().unwrap_or("not started"),
            failure.error
        );
    }
    out
}
