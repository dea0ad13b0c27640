use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use simbatch_model::TimeoutMs;

use crate::error::CoreError;

/// Batch-level settings.
///
/// Every field has a default so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory artifacts are written to.
    pub output_dir: PathBuf,
    /// Upper bound (exclusive) of the thread strategy's random sleep.
    pub max_sleep_ms: u64,
    /// Seed for reproducible samples and sleeps; entropy when unset.
    pub seed: Option<u64>,
    /// Per-task wall-clock limit.
    pub timeout_ms: Option<TimeoutMs>,
    /// Cap on in-flight tasks; unbounded when unset.
    pub max_concurrency: Option<usize>,
    /// Create artifacts with create-new semantics so name collisions fail loudly.
    pub exclusive_artifacts: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            max_sleep_ms: 1000,
            seed: None,
            timeout_ms: None,
            max_concurrency: None,
            exclusive_artifacts: false,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(CoreError::Config("output_dir must not be empty".into()));
        }
        if self.max_sleep_ms == 0 {
            return Err(CoreError::Config("max_sleep_ms must be greater than zero".into()));
        }
        if self.timeout_ms == Some(0) {
            return Err(CoreError::Config("timeout_ms must be greater than zero".into()));
        }
        if self.max_concurrency == Some(0) {
            return Err(CoreError::Config("max_concurrency must be greater than zero".into()));
        }
        Ok(())
    }
}
