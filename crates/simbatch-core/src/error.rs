use thiserror::Error;

use crate::runner::RunnerError;

/// Wiring and configuration errors.
///
/// Task-level problems never surface here; they are collected in the batch report.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no suitable runner for strategy: {0}")]
    NoRunner(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),
}
