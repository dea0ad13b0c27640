use std::{path::PathBuf, time::Duration};

use serde::Serialize;
use simbatch_model::{Category, Seq, Strategy};

use crate::{batch::group::TaskOutcome, task::TaskError};

/// One failed task of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFailure {
    /// Run id; absent when the task never started.
    pub run_id: Option<String>,
    pub label: String,
    pub category: Category,
    pub seq: Seq,
    pub error: TaskError,
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub strategy: Strategy,
    /// Tasks fanned out (`sum(counts)`), including those that failed to launch.
    pub launched: usize,
    pub succeeded: usize,
    /// Wall-clock time from batch start to the join barrier.
    pub elapsed_ms: u64,
    /// Artifacts of succeeded tasks, in launch order.
    pub artifacts: Vec<PathBuf>,
    /// Longest known task duration.
    pub longest_task_ms: Option<u64>,
    pub failures: Vec<TaskFailure>,
}

impl BatchReport {
    pub(crate) fn from_outcomes(strategy: Strategy, elapsed_ms: u64, outcomes: Vec<TaskOutcome>) -> Self {
        let launched = outcomes.len();
        let mut artifacts = Vec::new();
        let mut failures = Vec::new();
        let mut longest_task_ms = None;

        for TaskOutcome {
            run_id,
            spec,
            result,
        } in outcomes
        {
            match result {
                Ok(out) => {
                    if let Some(d) = out.duration {
                        longest_task_ms = longest_task_ms.max(Some(d.as_millis()));
                    }
                    artifacts.push(out.artifact);
                }
                Err(error) => failures.push(TaskFailure {
                    run_id,
                    label: spec.label(),
                    category: spec.category,
                    seq: spec.seq,
                    error,
                }),
            }
        }

        Self {
            strategy,
            launched,
            succeeded: artifacts.len(),
            elapsed_ms,
            artifacts,
            longest_task_ms,
            failures,
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}
