pub mod artifact;
pub mod batch;
pub mod clock;
pub mod config;
pub mod error;
pub mod router;
pub mod runner;
pub mod simulation;
pub mod task;

pub mod prelude {
    pub use crate::batch::{BatchReport, BatchRunner, TaskFailure};
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::config::BatchConfig;
    pub use crate::error::CoreError;
    pub use crate::router::RunnerRouter;
    pub use crate::runner::{BuildContext, Runner, RunnerError};
    pub use crate::task::{TaskError, TaskOutput, TaskRef};
}
