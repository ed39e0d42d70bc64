//! Timestamp codec and time ranges.
//!
//! All timestamps in humboldt are millisecond Unix epochs interpreted in
//! UTC. The human-facing format is the fixed pattern `DDMMYYYY:HHMM`
//! (zero-padded, 24-hour clock), also UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{HumboldtError, Result};

/// The fixed human date-time pattern used across the CLI and file names.
pub const DATE_FORMAT: &str = "%d%m%Y:%H%M";

/// Parses a `DDMMYYYY:HHMM` string into a millisecond Unix epoch (UTC).
///
/// # Errors
///
/// Returns [`HumboldtError::Format`] if the input does not match the
/// pattern exactly.
pub fn parse_timestamp(text: &str) -> Result<i64> {
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .map(|dt| dt.and_utc().timestamp_millis())
        .map_err(|_| HumboldtError::Format {
            input: text.to_string(),
        })
}

/// Formats a millisecond Unix epoch as `DDMMYYYY:HHMM` (UTC).
///
/// Exact inverse of [`parse_timestamp`] for any epoch on a whole minute.
///
/// # Errors
///
/// Returns [`HumboldtError::Format`] if the epoch value is outside the
/// representable date range.
pub fn format_timestamp(epoch_ms: i64) -> Result<String> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .ok_or(HumboldtError::Format {
            input: epoch_ms.to_string(),
        })
}

/// An inclusive range of millisecond Unix epochs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Start (inclusive, epoch milliseconds).
    pub start_ms: i64,
    /// End (inclusive, epoch milliseconds).
    pub end_ms: i64,
}

impl TimeRange {
    /// Creates a new range, validating that `start_ms <= end_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`HumboldtError::InvalidRange`] if the bounds are reversed.
    pub const fn new(start_ms: i64, end_ms: i64) -> Result<Self> {
        if start_ms > end_ms {
            return Err(HumboldtError::InvalidRange { start_ms, end_ms });
        }
        Ok(Self { start_ms, end_ms })
    }

    /// Parses a range from two `DDMMYYYY:HHMM` strings.
    ///
    /// # Errors
    ///
    /// Returns [`HumboldtError::Format`] for a malformed bound and
    /// [`HumboldtError::InvalidRange`] for reversed bounds.
    pub fn from_strings(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    /// Returns true if the range contains the given timestamp.
    #[must_use]
    pub const fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms <= self.end_ms
    }

    /// Returns the span of the range in milliseconds.
    #[must_use]
    pub const fn span_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start = format_timestamp(self.start_ms).map_err(|_| std::fmt::Error)?;
        let end = format_timestamp(self.end_ms).map_err(|_| std::fmt::Error)?;
        write!(f, "{start} to {end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        // 2024-01-01T00:00:00Z
        assert_eq!(parse_timestamp("01012024:0000").unwrap(), 1_704_067_200_000);
        // 2024-06-15T13:45:00Z
        assert_eq!(parse_timestamp("15062024:1345").unwrap(), 1_718_459_100_000);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for input in ["2024-01-01", "0101202:0000", "01012024 0000", "", "01012024:00"] {
            assert!(matches!(
                parse_timestamp(input),
                Err(HumboldtError::Format { .. })
            ));
        }
    }

    #[test]
    fn test_format_is_inverse_of_parse() {
        let text = "29022024:2359";
        let ms = parse_timestamp(text).unwrap();
        assert_eq!(format_timestamp(ms).unwrap(), text);
    }

    #[test]
    fn test_time_range_new() {
        let range = TimeRange::new(1000, 2000).unwrap();
        assert!(range.contains(1000));
        assert!(range.contains(2000));
        assert!(!range.contains(2001));
        assert_eq!(range.span_ms(), 1000);
    }

    #[test]
    fn test_time_range_invalid() {
        assert!(matches!(
            TimeRange::new(2000, 1000),
            Err(HumboldtError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_time_range_display() {
        let range = TimeRange::from_strings("01012024:0000", "02012024:1230").unwrap();
        assert_eq!(range.to_string(), "01012024:0000 to 02012024:1230");
    }
}
