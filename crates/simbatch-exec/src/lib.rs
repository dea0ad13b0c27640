mod error;
pub use error::ExecError;

pub mod subprocess;
pub mod thread;

use std::sync::Arc;

use simbatch_core::router::RunnerRouter;

use crate::{
    subprocess::{ProcessRunner, SubprocessConfig},
    thread::ThreadRunner,
};

/// Environment variable carrying the per-task seed to a child process.
pub const SEED_ENV: &str = "SIMBATCH_SEED";

/// Environment variable asking a child process for create-new artifact semantics.
pub const EXCLUSIVE_ENV: &str = "SIMBATCH_EXCLUSIVE_ARTIFACTS";

/// Child exit code: the artifact could not be written.
pub const CHILD_EXIT_IO: u8 = 1;

/// Child exit code: invalid task arguments.
pub const CHILD_EXIT_INPUT: u8 = 2;

/// Register the process and thread runners.
///
/// Afterwards every `Strategy` is routable.
pub fn register_builtin_runners(
    router: &mut RunnerRouter,
    subprocess: SubprocessConfig,
) -> Result<(), ExecError> {
    subprocess.validate()?;
    router.register(Arc::new(ProcessRunner::new(subprocess)));
    router.register(Arc::new(ThreadRunner::new()));
    Ok(())
}
