//! Router that selects the [`Runner`] for a given [`TaskSpec`].
//!
//! Runners are checked in registration order; the first one reporting
//! `supports(spec) == true` launches the task.
use std::sync::Arc;

use simbatch_model::TaskSpec;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, trace};

use crate::{
    error::CoreError,
    runner::{BuildContext, Runner},
    task::TaskRef,
};

#[derive(Default)]
pub struct RunnerRouter {
    runners: Vec<Arc<dyn Runner>>,
    ctx: BuildContext,
}

impl RunnerRouter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the build context handed to every runner.
    #[inline]
    pub fn with_context(mut self, ctx: BuildContext) -> Self {
        self.ctx = ctx;
        self
    }

    #[inline]
    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    #[inline]
    pub fn register(&mut self, runner: Arc<dyn Runner>) {
        self.runners.push(runner);
    }

    /// First registered runner supporting `spec`.
    pub fn pick(&self, spec: &TaskSpec) -> Option<&Arc<dyn Runner>> {
        self.runners.iter().find(|r| r.supports(spec))
    }

    /// Launch `spec` on the selected runner.
    #[instrument(level = "debug", skip(self, spec, cancel), fields(task = %spec.label()))]
    pub fn launch(&self, spec: &TaskSpec, cancel: CancellationToken) -> Result<TaskRef, CoreError> {
        let runner = self
            .pick(spec)
            .ok_or_else(|| CoreError::NoRunner(spec.strategy.to_string()))?;

        let task = runner.launch(spec, &self.ctx, cancel)?;
        trace!(runner = runner.name(), run_id = task.run_id(), "task launched");
        Ok(task)
    }
}
