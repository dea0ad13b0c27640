use std::{any::Any, thread};

use simbatch_core::{
    runner::{BuildContext, Runner, RunnerError, make_run_id},
    simulation::simulate,
    task::{TaskError, TaskOutput, TaskRef},
};
use simbatch_model::{Strategy, TaskSpec};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::ExecError;

/// Runs each task of the thread strategy on its own OS thread.
///
/// The thread reports through a one-shot channel; the waiting side never blocks
/// a runtime worker. Canceled or timed-out threads are detached and finish on
/// their own.
#[derive(Debug, Default)]
pub struct ThreadRunner;

impl ThreadRunner {
    pub const NAME: &'static str = "thread";

    pub fn new() -> Self {
        Self
    }
}

impl Runner for ThreadRunner {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supports(&self, spec: &TaskSpec) -> bool {
        spec.strategy == Strategy::Thread
    }

    fn launch(
        &self,
        spec: &TaskSpec,
        ctx: &BuildContext,
        cancel: CancellationToken,
    ) -> Result<TaskRef, RunnerError> {
        if !self.supports(spec) {
            return Err(ExecError::UnsupportedStrategy {
                expected: Self::NAME,
                actual: spec.strategy.to_string(),
            }
            .into());
        }

        let run_id = make_run_id(self.name(), &spec.label());
        let profile = spec.strategy.work_profile(ctx.max_sleep_ms());
        let (tx, rx) = oneshot::channel();

        let (body_spec, body_ctx) = (*spec, ctx.clone());
        let worker = thread::Builder::new()
            .name(format!("simbatch-{}", spec.label()))
            .spawn(move || {
                let _ = tx.send(simulate(&body_spec, &body_ctx, profile));
            })
            .map_err(|e| RunnerError::Launch {
                runner: Self::NAME,
                reason: format!("thread spawn failed: {e}"),
            })?;
        trace!(task = %run_id, "worker thread started");

        let task_id = run_id.clone();
        let fut = async move {
            tokio::select! {
                biased;
                reported = rx => match reported {
                    Ok(Ok((artifact, result))) => {
                        debug!(task = %task_id, artifact = %artifact.display(), "worker finished");
                        Ok(TaskOutput { artifact, duration: Some(result.duration()) })
                    }
                    Ok(Err(err)) => Err(err),
                    Err(_) => {
                        let reason = match tokio::task::spawn_blocking(move || worker.join()).await {
                            Ok(Err(payload)) => format!("worker panicked: {}", panic_message(payload.as_ref())),
                            Ok(Ok(())) => "worker exited without reporting".to_string(),
                            Err(e) => format!("worker join failed: {e}"),
                        };
                        warn!(task = %task_id, %reason, "wait on worker interrupted");
                        Err(TaskError::Interrupted { reason })
                    }
                },
                _ = cancel.cancelled() => {
                    debug!(task = %task_id, "cancellation requested; detaching worker");
                    Err(TaskError::Canceled)
                }
            }
        };

        Ok(TaskRef::new(run_id, *spec, fut))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
