use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::domain::Timestamp;
use crate::error::{ModelError, ModelResult};

/// Elapsed milliseconds, rendered as `<whole-seconds>_<remainder-milliseconds>`.
///
/// Neither component is zero-padded: `1234ms` renders as `1_234`, `5ms` as `0_5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMs(u64);

impl DurationMs {
    pub const fn new(millis: u64) -> Self {
        Self(millis)
    }

    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn whole_seconds(&self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub const fn remainder_millis(&self) -> u64 {
        self.0 % 1000
    }

    /// Parse the `<s>_<ms>` form.
    pub fn parse(s: &str) -> ModelResult<Self> {
        let invalid = || ModelError::Invalid(format!("malformed duration field: '{s}'"));

        let (secs, millis) = s.split_once('_').ok_or_else(invalid)?;
        let secs: u64 = secs.parse().map_err(|_| invalid())?;
        let millis: u64 = millis.parse().map_err(|_| invalid())?;
        if millis >= 1000 {
            return Err(invalid());
        }
        Ok(Self(secs * 1000 + millis))
    }
}

impl fmt::Display for DurationMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.whole_seconds(), self.remainder_millis())
    }
}

impl From<DurationMs> for Duration {
    fn from(d: DurationMs) -> Self {
        Duration::from_millis(d.0)
    }
}

/// Outcome of one simulated task: timing plus a placeholder measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskResult {
    start: Timestamp,
    end: Timestamp,
    sample: f64,
}

impl TaskResult {
    /// Build a result, enforcing `start <= end` and `sample ∈ [0, 1)`.
    pub fn new(start: Timestamp, end: Timestamp, sample: f64) -> ModelResult<Self> {
        if end < start {
            return Err(ModelError::Invalid(format!(
                "end timestamp {end} precedes start {start}"
            )));
        }
        if !(0.0..1.0).contains(&sample) {
            return Err(ModelError::Invalid(format!(
                "sample value {sample} is outside [0, 1)"
            )));
        }
        Ok(Self { start, end, sample })
    }

    #[inline]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    #[inline]
    pub fn sample(&self) -> f64 {
        self.sample
    }

    /// `end - start`; never negative by construction.
    pub fn duration(&self) -> DurationMs {
        DurationMs(self.end.millis_since(&self.start).unwrap_or(0))
    }

    /// Sample rendered as a decimal fraction; always contains a `.`.
    pub fn sample_text(&self) -> String {
        let text = self.sample.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{text}.0")
        }
    }
}
