//! Batch orchestration: fan out, launch, join, report.
mod group;
pub use group::{TaskGroup, TaskOutcome};

mod report;
pub use report::{BatchReport, TaskFailure};

use std::{sync::Arc, time::Duration};

use simbatch_model::{Counts, Strategy, TaskSpec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{config::BatchConfig, error::CoreError, router::RunnerRouter, task::TaskError};

/// Runs batches of simulated tasks with one strategy at a time.
pub struct BatchRunner {
    router: Arc<RunnerRouter>,
    config: BatchConfig,
    cancel: CancellationToken,
}

impl BatchRunner {
    pub fn new(router: RunnerRouter, config: BatchConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            router: Arc::new(router),
            config,
            cancel: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Token that cancels every in-flight and pending task when fired.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Launch `counts.total()` tasks with `strategy` and wait for all of them.
    ///
    /// Fails only when no runner supports the strategy; task failures are
    /// reported in [`BatchReport::failures`].
    #[instrument(level = "info", skip(self, strategy, counts), fields(strategy = %strategy, counts = ?counts.as_array()))]
    pub async fn run_batch(
        &self,
        strategy: Strategy,
        counts: &Counts,
    ) -> Result<BatchReport, CoreError> {
        let specs = TaskSpec::fan_out(strategy, counts);
        if let Some(first) = specs.first() {
            if self.router.pick(first).is_none() {
                return Err(CoreError::NoRunner(strategy.to_string()));
            }
        }

        let clock = Arc::clone(self.router.context().clock());
        let mut group = TaskGroup::new(
            self.config.max_concurrency,
            self.config.timeout_ms.map(Duration::from_millis),
        );

        let started = clock.now();
        info!(tasks = specs.len(), "batch started");

        for spec in specs {
            let permit = match group.admit(&self.cancel).await {
                Ok(permit) => permit,
                Err(err) => {
                    group.reject(spec, err);
                    continue;
                }
            };

            match self.router.launch(&spec, self.cancel.child_token()) {
                Ok(task) => {
                    debug!(run_id = task.run_id(), seq = spec.seq, "task running");
                    group.spawn(task, permit);
                }
                Err(e) => {
                    warn!(task = %spec.label(), error = %e, "task launch failed");
                    group.reject(spec, TaskError::Launch { reason: e.to_string() });
                }
            }
        }

        debug!(tasks = group.len(), "all tasks dispatched; waiting");
        let outcomes = group.await_all().await;
        let finished = clock.now();
        let elapsed_ms = finished.millis_since(&started).unwrap_or(0);

        let report = BatchReport::from_outcomes(strategy, elapsed_ms, outcomes);
        for failure in &report.failures {
            warn!(
                task = %failure.label,
                run_id = failure.run_id.as_deref().unwrap_or("-"),
                error = %failure.error,
                "task failed"
            );
        }
        info!(
            launched = report.launched,
            succeeded = report.succeeded,
            failed = report.failed(),
            elapsed_ms = report.elapsed_ms,
            "batch completed"
        );
        Ok(report)
    }
}
