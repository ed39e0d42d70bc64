//! Fixed-frequency forward-fill resampling.

use humboldt_types::SeriesRow;

/// Re-expresses a series on a fixed-frequency grid by forward-fill.
///
/// Emits one row per `period_ms` boundary between the first timestamp
/// (floored to the grid) and the last timestamp (ceiled to the grid),
/// each carrying the most recent observation at or before that boundary.
/// This is an upsample: no values are interpolated, the last known row is
/// repeated. Boundaries preceding the first observation are omitted.
///
/// Input must be normalized (sorted ascending, unique timestamps).
#[must_use]
pub fn resample_forward_fill<R: SeriesRow>(rows: &[R], period_ms: i64) -> Vec<R> {
    assert!(period_ms > 0, "resample period must be positive");

    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Vec::new();
    };

    let start = floor_to(first.timestamp_ms(), period_ms);
    let end = ceil_to(last.timestamp_ms(), period_ms);

    let mut out = Vec::with_capacity(((end - start) / period_ms + 1) as usize);
    let mut next = 0;
    let mut current: Option<&R> = None;

    let mut boundary = start;
    while boundary <= end {
        while next < rows.len() && rows[next].timestamp_ms() <= boundary {
            current = Some(&rows[next]);
            next += 1;
        }
        if let Some(row) = current {
            out.push(row.at_timestamp(boundary));
        }
        boundary += period_ms;
    }

    out
}

/// Floors a timestamp to the previous grid boundary.
const fn floor_to(timestamp_ms: i64, period_ms: i64) -> i64 {
    timestamp_ms.div_euclid(period_ms) * period_ms
}

/// Ceils a timestamp to the next grid boundary.
const fn ceil_to(timestamp_ms: i64, period_ms: i64) -> i64 {
    let floored = floor_to(timestamp_ms, period_ms);
    if floored == timestamp_ms {
        floored
    } else {
        floored + period_ms
    }
}
