//! Runner abstraction: one concurrency backend per implementation.
//!
//! Concrete runners live in `simbatch-exec` and are plugged into the router.
mod error;
pub use error::RunnerError;

mod context;
pub use context::BuildContext;

mod id;
pub use id::make_run_id;

use simbatch_model::TaskSpec;
use tokio_util::sync::CancellationToken;

use crate::task::TaskRef;

/// Concurrency backend for one task.
///
/// A runner is responsible for:
/// - deciding whether it can execute a given [`TaskSpec`] (`supports`);
/// - starting the task's unit of concurrency and returning a [`TaskRef`] that resolves
///   once the unit has finished (`launch`).
///
/// `launch` is synchronous: the process or thread exists when it returns, which keeps
/// launch order identical to fan-out order.
pub trait Runner: Send + Sync {
    /// Runner name used in logs and run ids.
    fn name(&self) -> &'static str;

    /// Returns `true` if this runner can execute the given spec.
    fn supports(&self, spec: &TaskSpec) -> bool;

    /// Start the task.
    ///
    /// `cancel` fires when the batch is canceled; the returned future must then
    /// resolve with `TaskError::Canceled`.
    fn launch(
        &self,
        spec: &TaskSpec,
        ctx: &BuildContext,
        cancel: CancellationToken,
    ) -> Result<TaskRef, RunnerError>;
}
