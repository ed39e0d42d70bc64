//! Earliest-history discovery.
//!
//! When no local baseline exists, the prober finds the earliest timestamp
//! at which upstream data exists, at day granularity, using bounded
//! single-record existence queries.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use humboldt_types::{HumboldtError, Result};
use tracing::{debug, info};

const DAY_MS: i64 = 86_400_000;

/// A bounded existence oracle over the upstream history.
///
/// A probe failure (transport or API error) must propagate; only a clean
/// "no records" answer may be used as a search decision.
#[async_trait]
pub trait ProbeSource {
    /// Does at least one record exist in `[start_ms, end_ms)`?
    async fn exists_within(&self, start_ms: i64, end_ms: i64) -> Result<bool>;
}

/// Search strategy for the earliest-history scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeStrategy {
    /// Year-backward, then month, then day linear scan. At most
    /// `years_scanned + 12 + 31` probes.
    #[default]
    Linear,
    /// Binary search over days, exploiting that backfilled history is
    /// contiguous from one earliest point forward. O(log days) probes.
    Binary,
}

/// Discovers the earliest available upstream history.
///
/// Both strategies sit behind [`HistoryProber::earliest`], so the policy
/// can be swapped without touching callers.
#[derive(Debug, Clone)]
pub struct HistoryProber {
    floor_year: i32,
    strategy: ProbeStrategy,
}

impl HistoryProber {
    /// Creates a prober that never searches before `floor_year`.
    #[must_use]
    pub const fn new(floor_year: i32, strategy: ProbeStrategy) -> Self {
        Self {
            floor_year,
            strategy,
        }
    }

    /// Returns the earliest timestamp (day start, epoch ms) with data.
    ///
    /// # Errors
    ///
    /// Returns [`HumboldtError::NoHistory`] if no probe hits at or after
    /// the floor year; probe transport/API failures propagate unchanged.
    pub async fn earliest<S: ProbeSource + Sync>(&self, source: &S, now_ms: i64) -> Result<i64> {
        let earliest = match self.strategy {
            ProbeStrategy::Linear => self.scan_linear(source, now_ms).await?,
            ProbeStrategy::Binary => self.search_binary(source, now_ms).await?,
        };
        info!(earliest_ms = earliest, "earliest history located");
        Ok(earliest)
    }

    /// Year-backward, then month, then day ascending scan.
    async fn scan_linear<S: ProbeSource + Sync>(&self, source: &S, now_ms: i64) -> Result<i64> {
        let current_year = DateTime::<Utc>::from_timestamp_millis(now_ms)
            .map(|dt| dt.year())
            .unwrap_or(self.floor_year);

        // Walk backward past the first year with data to rule out
        // continuous earlier history.
        let mut earliest_year = None;
        for year in (self.floor_year..=current_year).rev() {
            let start = year_start_ms(year);
            let end = year_start_ms(year + 1).min(now_ms + 1);
            if start >= end {
                continue;
            }
            if source.exists_within(start, end).await? {
                earliest_year = Some(year);
            } else if earliest_year.is_some() {
                break;
            }
            debug!(year, hit = earliest_year == Some(year), "year probed");
        }
        let year = earliest_year.ok_or(HumboldtError::NoHistory {
            floor_year: self.floor_year,
        })?;

        // First month with data, ascending.
        let mut earliest_month = None;
        for month in 1..=12 {
            let start = month_start_ms(year, month);
            if start > now_ms {
                break;
            }
            if source.exists_within(start, next_month_start_ms(year, month)).await? {
                earliest_month = Some(month);
                break;
            }
        }
        let month = earliest_month.ok_or(HumboldtError::NoHistory {
            floor_year: self.floor_year,
        })?;

        // First day with data, ascending; calendar-invalid day numbers
        // are skipped without being treated as misses.
        for day in 1..=31 {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            let start = day_start_ms(date);
            if start > now_ms {
                break;
            }
            if source.exists_within(start, start + DAY_MS).await? {
                return Ok(start);
            }
        }

        Err(HumboldtError::NoHistory {
            floor_year: self.floor_year,
        })
    }

    /// Binary search over days on the monotonic "any data before the end
    /// of day D" predicate.
    async fn search_binary<S: ProbeSource + Sync>(&self, source: &S, now_ms: i64) -> Result<i64> {
        let floor_ms = year_start_ms(self.floor_year);
        let first_day = floor_ms.div_euclid(DAY_MS);
        let last_day = now_ms.div_euclid(DAY_MS);

        if !source
            .exists_within(floor_ms, (last_day + 1) * DAY_MS)
            .await?
        {
            return Err(HumboldtError::NoHistory {
                floor_year: self.floor_year,
            });
        }

        let (mut lo, mut hi) = (first_day, last_day);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if source.exists_within(floor_ms, (mid + 1) * DAY_MS).await? {
                hi = mid;
            } else {
                lo = mid + 1;
            }
            debug!(lo, hi, "day window narrowed");
        }
        Ok(lo * DAY_MS)
    }
}

/// Midnight UTC of January 1st of the given year, epoch ms.
fn year_start_ms(year: i32) -> i64 {
    month_start_ms(year, 1)
}

/// Midnight UTC of the first of the given month, epoch ms.
fn month_start_ms(year: i32, month: u32) -> i64 {
    // Month numbers are bounded by the callers; fall back to the epoch
    // only for out-of-range years chrono cannot represent.
    NaiveDate::from_ymd_opt(year, month, 1).map_or(0, day_start_ms)
}

/// Midnight UTC of the month after the given one, epoch ms.
fn next_month_start_ms(year: i32, month: u32) -> i64 {
    if month == 12 {
        month_start_ms(year + 1, 1)
    } else {
        month_start_ms(year, month + 1)
    }
}

/// Midnight UTC of the given date, epoch ms.
fn day_start_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map_or(0, |dt| dt.and_utc().timestamp_millis())
}
