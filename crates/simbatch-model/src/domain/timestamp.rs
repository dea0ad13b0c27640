use std::fmt;

use time::{
    Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::BorrowedFormatItem, macros::format_description,
};

use crate::error::{ModelError, ModelResult};

/// Artifact timestamp layout: `yyyyMMdd_HHmmss_SS` (`SS` = hundredths of a second).
const ARTIFACT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]_[subsecond digits:2]");

/// Wall-clock instant recorded by a task, truncated to millisecond resolution.
///
/// Millisecond truncation keeps `end - start` exact when durations are rendered
/// as whole seconds plus remainder milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Wrap a datetime, dropping everything below the millisecond.
    pub fn from_datetime(dt: OffsetDateTime) -> Self {
        let sub_ms = i64::from(dt.nanosecond() % 1_000_000);
        Self(dt - Duration::nanoseconds(sub_ms))
    }

    /// Current instant expressed in the given offset.
    pub fn now_with_offset(offset: UtcOffset) -> Self {
        Self::from_datetime(OffsetDateTime::now_utc().to_offset(offset))
    }

    /// Current instant in UTC.
    pub fn now_utc() -> Self {
        Self::now_with_offset(UtcOffset::UTC)
    }

    /// Underlying datetime.
    #[inline]
    pub fn as_datetime(&self) -> OffsetDateTime {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, or `None` if `earlier` is later than `self`.
    pub fn millis_since(&self, earlier: &Timestamp) -> Option<u64> {
        let delta = self.0 - earlier.0;
        if delta.is_negative() {
            return None;
        }
        u64::try_from(delta.whole_milliseconds()).ok()
    }

    /// Parse the artifact layout back into a timestamp in the given offset.
    ///
    /// The artifact layout only keeps hundredths, so the result is accurate to 10ms.
    pub fn parse(value: &str, offset: UtcOffset) -> ModelResult<Self> {
        PrimitiveDateTime::parse(value, ARTIFACT_FORMAT)
            .map(|dt| Self(dt.assume_offset(offset)))
            .map_err(|e| ModelError::InvalidTimestamp {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(dt: OffsetDateTime) -> Self {
        Self::from_datetime(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.0.format(ARTIFACT_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn renders_hundredths_zero_padded() {
        let ts = Timestamp::from(datetime!(2024-03-05 07:08:09.456 UTC));
        assert_eq!(ts.to_string(), "20240305_070809_45");

        let ts = Timestamp::from(datetime!(2024-12-31 23:59:59.004 UTC));
        assert_eq!(ts.to_string(), "20241231_235959_00");
    }

    #[test]
    fn truncates_below_millisecond() {
        let ts = Timestamp::from(datetime!(2024-01-01 00:00:00.123456789 UTC));
        assert_eq!(ts.as_datetime().nanosecond(), 123_000_000);
    }

    #[test]
    fn millis_since_is_exact_and_ordered() {
        let start = Timestamp::from(datetime!(2024-01-01 00:00:00.250 UTC));
        let end = Timestamp::from(datetime!(2024-01-01 00:00:01.484 UTC));
        assert_eq!(end.millis_since(&start), Some(1_234));
        assert_eq!(start.millis_since(&end), None);
        assert_eq!(start.millis_since(&start), Some(0));
    }

    #[test]
    fn parse_reads_rendered_form() {
        let ts = Timestamp::from(datetime!(2024-03-05 07:08:09.450 UTC));
        let parsed = Timestamp::parse(&ts.to_string(), UtcOffset::UTC).unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = Timestamp::parse("2024-03-05", UtcOffset::UTC).unwrap_err();
        assert!(matches!(err, ModelError::InvalidTimestamp { .. }));
    }

    #[test]
    fn keeps_local_offset_in_rendering() {
        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        let ts = Timestamp::from(datetime!(2024-06-01 22:30:00 UTC).to_offset(offset));
        assert_eq!(ts.to_string(), "20240602_003000_00");
    }
}
