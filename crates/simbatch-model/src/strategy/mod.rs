mod work;
pub use work::WorkProfile;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Concurrency backend used to execute a batch.
///
/// - `Process`: every task is an independently launched child process.
/// - `Thread`: every task is an OS thread inside the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Process,
    Thread,
}

impl Strategy {
    /// Both strategies in the order the frontend runs them.
    pub const ALL: [Strategy; 2] = [Strategy::Process, Strategy::Thread];

    /// Mode tag embedded in artifact names (`MP` / `MT`).
    pub const fn mode(&self) -> &'static str {
        match self {
            Strategy::Process => "MP",
            Strategy::Thread => "MT",
        }
    }

    /// Canonical lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Strategy::Process => "process",
            Strategy::Thread => "thread",
        }
    }

    /// Work phase of the task body under this strategy.
    ///
    /// Process tasks record `end` right after `start`; thread tasks sleep a random
    /// interval below `max_sleep_ms` first.
    pub const fn work_profile(&self, max_sleep_ms: u64) -> WorkProfile {
        match self {
            Strategy::Process => WorkProfile::Immediate,
            Strategy::Thread => WorkProfile::Sleep {
                max_ms: max_sleep_ms,
            },
        }
    }
}

impl FromStr for Strategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" | "mp" | "multiprocess" => Ok(Strategy::Process),
            "thread" | "mt" | "multithread" => Ok(Strategy::Thread),
            other => Err(ModelError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
