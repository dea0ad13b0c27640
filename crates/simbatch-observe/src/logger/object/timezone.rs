use std::{fmt, str::FromStr, sync::RwLock};

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::logger::error::LoggerError;

static LOCAL_OFFSET: RwLock<UtcOffset> = RwLock::new(UtcOffset::UTC);

/// Timezone of log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    Local,
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        })
    }
}

/// Detects and caches the local UTC offset.
///
/// **Call in `main()` before spawning any threads** (including the tokio runtime):
/// detection fails in multi-threaded processes on most Unix platforms. Falls back to
/// UTC when detection fails. Returns the cached value.
///
/// # Example
/// ```no_run
/// fn main() {
///     let offset = simbatch_observe::init_local_offset();
///     std::thread::spawn(move || println!("{offset}")).join().unwrap();
/// }
/// ```
pub fn init_local_offset() -> UtcOffset {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    if let Ok(mut guard) = LOCAL_OFFSET.write() {
        *guard = offset;
    }
    offset
}

/// Offset cached by [`init_local_offset`] (UTC before it runs).
pub fn local_offset() -> UtcOffset {
    LOCAL_OFFSET.read().map(|guard| *guard).unwrap_or(UtcOffset::UTC)
}
