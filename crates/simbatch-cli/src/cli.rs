use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use simbatch_core::config::BatchConfig;
use simbatch_model::{Counts, Strategy};
use simbatch_observe::{LoggerConfig, LoggerFormat, LoggerLevel, LoggerTimeZone};

#[derive(Debug, Parser)]
#[command(name = "simbatch", version)]
#[command(about = "Run simulation batches with child processes and with threads")]
pub struct Cli {
    /// Log filter expression (e.g. "info", "simbatch_core=debug,info").
    #[arg(long, global = true, env = "SIMBATCH_LOG", default_value = "info")]
    pub log_level: LoggerLevel,

    /// Log format: text, json or journald.
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LoggerFormat,

    /// Timezone of log timestamps: utc or local.
    #[arg(long, global = true, default_value = "utc")]
    pub log_tz: LoggerTimeZone,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a process batch, then a thread batch, over four category counts.
    Run(RunArgs),

    /// Run a single task (`<category> <count>`); used as the child of process batches.
    Task {
        #[arg(
            value_name = "ARGS",
            num_args = 0..,
            allow_hyphen_values = true,
            trailing_var_arg = true
        )]
        args: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Tasks per category, for categories 1 to 4.
    #[arg(value_name = "COUNT", num_args = 4, required = true)]
    pub counts: Vec<u32>,

    /// Only run this strategy (process or thread).
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// JSON file with batch settings; flags override it.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory artifacts are written to.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Seed for reproducible sleeps and samples.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Upper bound of the thread strategy's random sleep.
    #[arg(long)]
    pub max_sleep_ms: Option<u64>,

    /// Per-task time limit.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Maximum number of tasks in flight.
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Fail a task instead of overwriting an artifact with the same name.
    #[arg(long)]
    pub exclusive_artifacts: bool,

    /// Print batch reports as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            tz: self.log_tz,
            ..Default::default()
        }
    }

    /// Global flags a child process is started with, followed by the `task` subcommand.
    pub fn child_args(&self) -> Vec<String> {
        vec![
            "--log-level".into(),
            self.log_level.as_str().into(),
            "--log-format".into(),
            self.log_format.to_string(),
            "--log-tz".into(),
            self.log_tz.to_string(),
            "task".into(),
        ]
    }
}

impl RunArgs {
    pub fn counts(&self) -> anyhow::Result<Counts> {
        Counts::try_from(self.counts.as_slice()).context("expected exactly four counts")
    }

    pub fn strategies(&self) -> Vec<Strategy> {
        match self.strategy {
            Some(strategy) => vec![strategy],
            None => Strategy::ALL.to_vec(),
        }
    }

    /// Config file (or defaults) with command-line overrides applied.
    pub fn batch_config(&self) -> anyhow::Result<BatchConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => BatchConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if let Some(ms) = self.max_sleep_ms {
            cfg.max_sleep_ms = ms;
        }
        if self.timeout_ms.is_some() {
            cfg.timeout_ms = self.timeout_ms;
        }
        if self.max_concurrency.is_some() {
            cfg.max_concurrency = self.max_concurrency;
        }
        cfg.exclusive_artifacts |= self.exclusive_artifacts;
        Ok(cfg)
    }
}
