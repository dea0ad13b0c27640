//! Task body shared by every strategy.
use std::{path::PathBuf, thread, time::Duration};

use rand::Rng;
use simbatch_model::{TaskResult, TaskSpec, WorkProfile};
use tracing::debug;

use crate::{artifact, runner::BuildContext, task::TaskError};

/// Run one simulated task on the current thread and write its artifact.
///
/// Blocking: call from an OS thread, a child process or `spawn_blocking`.
pub fn simulate(
    spec: &TaskSpec,
    ctx: &BuildContext,
    profile: WorkProfile,
) -> Result<(PathBuf, TaskResult), TaskError> {
    let mut rng = ctx.rng_for(spec.seq);
    let clock = ctx.clock();

    let start = clock.now();
    if let WorkProfile::Sleep { max_ms } = profile {
        if max_ms > 0 {
            let nap = rng.gen_range(0..max_ms);
            thread::sleep(Duration::from_millis(nap));
        }
    }
    let end = clock.now();

    let sample: f64 = rng.r#gen();
    let result = TaskResult::new(start, end, sample).map_err(|e| TaskError::InvalidResult {
        reason: e.to_string(),
    })?;

    let path = artifact::artifact_path(ctx.output_dir(), spec, &start);
    artifact::write(&path, &result, ctx.exclusive_artifacts())?;

    debug!(
        task = %spec.label(),
        artifact = %path.display(),
        duration = %result.duration(),
        "artifact written"
    );
    Ok((path, result))
}
