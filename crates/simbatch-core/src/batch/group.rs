use std::{sync::Arc, time::Duration};

use simbatch_model::TaskSpec;
use tokio::{
    sync::{OwnedSemaphorePermit, Semaphore},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::task::{TaskError, TaskOutput, TaskRef};

/// Final state of one task of the group.
#[derive(Debug)]
pub struct TaskOutcome {
    pub run_id: Option<String>,
    pub spec: TaskSpec,
    pub result: Result<TaskOutput, TaskError>,
}

enum Slot {
    Running(JoinHandle<Result<TaskOutput, TaskError>>),
    Rejected(TaskError),
}

struct Entry {
    run_id: Option<String>,
    spec: TaskSpec,
    slot: Slot,
}

/// Fork-join set over the tasks of one batch.
///
/// Tracks every task in launch order. [`TaskGroup::await_all`] waits for all of
/// them and collects failures instead of stopping at the first one.
pub struct TaskGroup {
    entries: Vec<Entry>,
    limiter: Option<Arc<Semaphore>>,
    timeout: Option<Duration>,
}

impl TaskGroup {
    pub fn new(max_concurrency: Option<usize>, timeout: Option<Duration>) -> Self {
        Self {
            entries: Vec::new(),
            limiter: max_concurrency.map(|n| Arc::new(Semaphore::new(n))),
            timeout,
        }
    }

    /// Wait for a free slot.
    ///
    /// Returns `Ok(None)` when the group is unbounded and `Err(Canceled)` if
    /// `cancel` fires first.
    pub async fn admit(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<OwnedSemaphorePermit>, TaskError> {
        if cancel.is_cancelled() {
            return Err(TaskError::Canceled);
        }
        let Some(limiter) = &self.limiter else {
            return Ok(None);
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TaskError::Canceled),
            permit = Arc::clone(limiter).acquire_owned() => permit
                .map(Some)
                .map_err(|e| TaskError::Interrupted { reason: e.to_string() }),
        }
    }

    /// Drive a launched task in the background; the permit is held until it finishes.
    pub fn spawn(&mut self, task: TaskRef, permit: Option<OwnedSemaphorePermit>) {
        let (run_id, spec, fut) = task.into_parts();
        let timeout = self.timeout;

        let handle = tokio::spawn(async move {
            let _permit = permit;
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(res) => res,
                    Err(_) => Err(TaskError::Timeout {
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    }),
                },
                None => fut.await,
            }
        });

        self.entries.push(Entry {
            run_id: Some(run_id),
            spec,
            slot: Slot::Running(handle),
        });
    }

    /// Record a task that never started.
    pub fn reject(&mut self, spec: TaskSpec, err: TaskError) {
        self.entries.push(Entry {
            run_id: None,
            spec,
            slot: Slot::Rejected(err),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join barrier: resolves once every task of the group has returned.
    pub async fn await_all(self) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::with_capacity(self.entries.len());

        for Entry { run_id, spec, slot } in self.entries {
            let result = match slot {
                Slot::Rejected(err) => Err(err),
                Slot::Running(handle) => match handle.await {
                    Ok(res) => res,
                    Err(e) => {
                        warn!(task = %spec.label(), error = %e, "wait on task interrupted");
                        Err(TaskError::Interrupted {
                            reason: e.to_string(),
                        })
                    }
                },
            };
            outcomes.push(TaskOutcome {
                run_id,
                spec,
                result,
            });
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simbatch_model::{Category, Strategy};
    use std::{
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
    };

    fn spec(seq: u32) -> TaskSpec {
        TaskSpec::new(Strategy::Thread, Category::new(1).unwrap(), seq, seq)
    }

    fn output() -> TaskOutput {
        TaskOutput {
            artifact: PathBuf::from("a.sim"),
            duration: None,
        }
    }

    #[tokio::test]
    async fn await_all_keeps_launch_order() {
        let mut group = TaskGroup::new(None, None);
        for (seq, delay) in [(1u32, 30u64), (2, 0), (3, 10)] {
            let task = TaskRef::new(format!("t{seq}"), spec(seq), async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(output())
            });
            group.spawn(task, None);
        }

        let seqs: Vec<u32> = group.await_all().await.iter().map(|o| o.spec.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_join() {
        let mut group = TaskGroup::new(None, None);
        group.spawn(
            TaskRef::new("bad", spec(1), async { Err(TaskError::NonZeroExit { code: Some(1) }) }),
            None,
        );
        group.reject(spec(2), TaskError::Launch { reason: "nope".into() });
        group.spawn(TaskRef::new("good", spec(3), async { Ok(output()) }), None);

        let outcomes = group.await_all().await;
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_err());
        assert_eq!(outcomes[1].run_id, None);
        assert!(outcomes[2].result.is_ok());
    }

    #[tokio::test]
    async fn panicking_task_is_interrupted() {
        let mut group = TaskGroup::new(None, None);
        group.spawn(
            TaskRef::new("boom", spec(1), async {
                if true {
                    panic!("worker died");
                }
                Ok(output())
            }),
            None,
        );

        let outcomes = group.await_all().await;
        assert!(matches!(outcomes[0].result, Err(TaskError::Interrupted { .. })));
    }

    #[tokio::test]
    async fn timeout_is_recorded_per_task() {
        let mut group = TaskGroup::new(None, Some(Duration::from_millis(20)));
        group.spawn(
            TaskRef::new("slow", spec(1), async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(output())
            }),
            None,
        );

        let outcomes = group.await_all().await;
        assert_eq!(outcomes[0].result, Err(TaskError::Timeout { timeout_ms: 20 }));
    }

    #[tokio::test]
    async fn limiter_caps_in_flight_tasks() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();
        let mut group = TaskGroup::new(Some(2), None);

        for seq in 1..=6 {
            let permit = group.admit(&cancel).await.unwrap();
            assert!(permit.is_some());

            let (in_flight, peak) = (Arc::clone(&in_flight), Arc::clone(&peak));
            let task = TaskRef::new(format!("t{seq}"), spec(seq), async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(output())
            });
            group.spawn(task, permit);
        }

        let outcomes = group.await_all().await;
        assert_eq!(outcomes.len(), 6);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn admit_fails_after_cancel() {
        let group = TaskGroup::new(Some(1), None);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(group.admit(&cancel).await.unwrap_err(), TaskError::Canceled);
    }
}
