use std::{fmt, future::Future, path::PathBuf, pin::Pin};

use serde::Serialize;
use simbatch_model::{DurationMs, TaskSpec};
use thiserror::Error;

use crate::artifact::ArtifactError;

/// What a finished task hands back to the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    /// Path of the artifact the task wrote.
    pub artifact: PathBuf,
    /// Task duration, when known to the waiting side.
    pub duration: Option<DurationMs>,
}

/// Per-task failure.
///
/// Recorded in the batch report; never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskError {
    #[error("launch failed: {reason}")]
    Launch { reason: String },

    #[error("artifact io failed for {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("child exited unsuccessfully (code {})", display_code(.code))]
    NonZeroExit { code: Option<i32> },

    #[error("wait interrupted: {reason}")]
    Interrupted { reason: String },

    #[error("invalid result: {reason}")]
    InvalidResult { reason: String },

    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("canceled")]
    Canceled,
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none, terminated by signal".to_string(),
    }
}

impl TaskError {
    /// Short machine-readable tag, matching the serialized `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskError::Launch { .. } => "launch",
            TaskError::Io { .. } => "io",
            TaskError::NonZeroExit { .. } => "non_zero_exit",
            TaskError::Interrupted { .. } => "interrupted",
            TaskError::InvalidResult { .. } => "invalid_result",
            TaskError::Timeout { .. } => "timeout",
            TaskError::Canceled => "canceled",
        }
    }
}

impl From<ArtifactError> for TaskError {
    fn from(e: ArtifactError) -> Self {
        match e {
            ArtifactError::Io { path, source } => TaskError::Io {
                path: path.display().to_string(),
                reason: source.to_string(),
            },
            ArtifactError::Malformed { path, reason } => TaskError::InvalidResult {
                reason: format!("{}: {reason}", path.display()),
            },
        }
    }
}

pub type TaskFuture = Pin<Box<dyn Future<Output = Result<TaskOutput, TaskError>> + Send + 'static>>;

/// Handle to a launched task.
pub struct TaskRef {
    run_id: String,
    spec: TaskSpec,
    fut: TaskFuture,
}

impl TaskRef {
    pub fn new<F>(run_id: impl Into<String>, spec: TaskSpec, fut: F) -> Self
    where
        F: Future<Output = Result<TaskOutput, TaskError>> + Send + 'static,
    {
        Self {
            run_id: run_id.into(),
            spec,
            fut: Box::pin(fut),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn spec(&self) -> &TaskSpec {
        &self.spec
    }

    pub fn into_parts(self) -> (String, TaskSpec, TaskFuture) {
        (self.run_id, self.spec, self.fut)
    }
}

impl fmt::Debug for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRef")
            .field("run_id", &self.run_id)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_serialize_with_kind_tag() {
        let json = serde_json::to_value(TaskError::Timeout { timeout_ms: 50 }).unwrap();
        assert_eq!(json["kind"], "timeout");
        assert_eq!(json["timeout_ms"], 50);

        let json = serde_json::to_value(TaskError::Canceled).unwrap();
        assert_eq!(json["kind"], TaskError::Canceled.kind());
    }

    #[test]
    fn non_zero_exit_message_covers_signals() {
        assert_eq!(
            TaskError::NonZeroExit { code: Some(2) }.to_string(),
            "child exited unsuccessfully (code 2)"
        );
        assert!(
            TaskError::NonZeroExit { code: None }
                .to_string()
                .contains("signal")
        );
    }
}
