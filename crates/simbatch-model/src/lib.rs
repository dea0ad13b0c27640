mod domain;
pub use domain::{Category, Counts, Seq, Timestamp, TimeoutMs};

mod error;
pub use error::{ModelError, ModelResult};

mod result;
pub use result::{DurationMs, TaskResult};

mod spec;
pub use spec::{EntryArgs, TaskSpec};

mod strategy;
pub use strategy::{Strategy, WorkProfile};
