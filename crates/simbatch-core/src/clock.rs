//! Wall-clock source used for task and batch timestamps.
//!
//! Timestamps end up in artifact names and contents, so the offset matters:
//! the frontend feeds the local offset detected at startup.
use std::{
    fmt,
    sync::{Mutex, MutexGuard},
};

use simbatch_model::Timestamp;
use time::{Duration, OffsetDateTime, UtcOffset};

/// Source of "now".
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant.
    fn now(&self) -> Timestamp;

    /// Offset the returned timestamps are expressed in.
    fn offset(&self) -> UtcOffset;
}

/// System wall clock rendered in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now_with_offset(self.offset)
    }

    fn offset(&self) -> UtcOffset {
        self.offset
    }
}

/// Deterministic clock for tests.
///
/// Every call to `now()` returns the current value and then advances it by `step`.
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<OffsetDateTime>,
    step: Duration,
}

impl FixedClock {
    pub fn new(at: OffsetDateTime) -> Self {
        Self::with_step(at, Duration::ZERO)
    }

    pub fn with_step(at: OffsetDateTime, step: Duration) -> Self {
        Self {
            current: Mutex::new(at),
            step,
        }
    }

    fn lock(&self) -> MutexGuard<'_, OffsetDateTime> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        let mut current = self.lock();
        let now = *current;
        *current = now + self.step;
        Timestamp::from(now)
    }

    fn offset(&self) -> UtcOffset {
        self.lock().offset()
    }
}
