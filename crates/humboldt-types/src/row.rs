//! Canonical row types shared by every dataset.
//!
//! A normalized series is a `Vec` of one of these row types, sorted
//! ascending by timestamp with no duplicate timestamps. The [`SeriesRow`]
//! trait is the seam that lets the store and the merge/resample engine
//! stay generic over the concrete column set.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{HumboldtError, Result};

/// A raw record as returned by an upstream API, before normalization.
///
/// The shape depends on the endpoint (kline rows are positional arrays,
/// the rest are string-keyed objects), so it stays an opaque JSON value
/// until the normalizer maps it onto a typed row.
pub type RawRecord = serde_json::Value;

/// A typed, timestamp-keyed row of one dataset.
pub trait SeriesRow: Sized + std::fmt::Debug {
    /// Column names in persisted order; `timestamp` is always first.
    const COLUMNS: &'static [&'static str];

    /// The row key: millisecond Unix epoch.
    fn timestamp_ms(&self) -> i64;

    /// Renders the row as one field per column, in [`Self::COLUMNS`] order.
    fn to_fields(&self) -> Vec<String>;

    /// Parses a row from one field per column.
    ///
    /// # Errors
    ///
    /// Returns [`HumboldtError::Store`] if the field count or any field
    /// value does not match the column layout.
    fn from_fields(fields: &[&str]) -> Result<Self>;

    /// Returns a copy of the row re-keyed to the given timestamp.
    ///
    /// Used by the resampler to repeat the last known observation on a
    /// new grid boundary.
    fn at_timestamp(&self, timestamp_ms: i64) -> Self;
}

/// Parses one positional field, naming the column on failure.
fn field<T: FromStr>(fields: &[&str], index: usize, column: &str) -> Result<T> {
    let raw = fields
        .get(index)
        .ok_or_else(|| HumboldtError::Store(format!("missing column '{column}'")))?;
    raw.parse()
        .map_err(|_| HumboldtError::Store(format!("bad value '{raw}' in column '{column}'")))
}

/// Checks that a row has exactly the expected number of fields.
fn expect_width(fields: &[&str], expected: usize) -> Result<()> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(HumboldtError::Store(format!(
            "expected {expected} columns, found {}",
            fields.len()
        )))
    }
}

/// One price candle (kline) bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time (epoch milliseconds).
    pub timestamp_ms: i64,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded base-asset volume.
    pub volume: f64,
    /// Traded quote-asset turnover.
    pub turnover: f64,
}

impl SeriesRow for Candle {
    const COLUMNS: &'static [&'static str] = &[
        "timestamp",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "turnover",
    ];

    fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.timestamp_ms.to_string(),
            self.open.to_string(),
            self.high.to_string(),
            self.low.to_string(),
            self.close.to_string(),
            self.volume.to_string(),
            self.turnover.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self> {
        expect_width(fields, Self::COLUMNS.len())?;
        Ok(Self {
            timestamp_ms: field(fields, 0, "timestamp")?,
            open: field(fields, 1, "open")?,
            high: field(fields, 2, "high")?,
            low: field(fields, 3, "low")?,
            close: field(fields, 4, "close")?,
            volume: field(fields, 5, "volume")?,
            turnover: field(fields, 6, "turnover")?,
        })
    }

    fn at_timestamp(&self, timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            ..*self
        }
    }
}

/// One open-interest observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenInterest {
    /// Observation time (epoch milliseconds).
    pub timestamp_ms: i64,
    /// Outstanding contract interest.
    pub open_interest: f64,
}

impl SeriesRow for OpenInterest {
    const COLUMNS: &'static [&'static str] = &["timestamp", "open_interest"];

    fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    fn to_fields(&self) -> Vec<String> {
        vec![self.timestamp_ms.to_string(), self.open_interest.to_string()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self> {
        expect_width(fields, Self::COLUMNS.len())?;
        Ok(Self {
            timestamp_ms: field(fields, 0, "timestamp")?,
            open_interest: field(fields, 1, "open_interest")?,
        })
    }

    fn at_timestamp(&self, timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            ..*self
        }
    }
}

/// One funding-rate settlement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingRate {
    /// Settlement time (epoch milliseconds).
    pub timestamp_ms: i64,
    /// Funding rate applied at this settlement.
    pub funding_rate: f64,
}

impl SeriesRow for FundingRate {
    const COLUMNS: &'static [&'static str] = &["timestamp", "funding_rate"];

    fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    fn to_fields(&self) -> Vec<String> {
        vec![self.timestamp_ms.to_string(), self.funding_rate.to_string()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self> {
        expect_width(fields, Self::COLUMNS.len())?;
        Ok(Self {
            timestamp_ms: field(fields, 0, "timestamp")?,
            funding_rate: field(fields, 1, "funding_rate")?,
        })
    }

    fn at_timestamp(&self, timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            ..*self
        }
    }
}

/// One Fear & Greed index reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FearGreed {
    /// Reading time (epoch milliseconds).
    pub timestamp_ms: i64,
    /// Index value, 0 (extreme fear) to 100 (extreme greed).
    pub fear_greed_index: i64,
}

impl SeriesRow for FearGreed {
    const COLUMNS: &'static [&'static str] = &["timestamp", "fear_greed_index"];

    fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.timestamp_ms.to_string(),
            self.fear_greed_index.to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self> {
        expect_width(fields, Self::COLUMNS.len())?;
        Ok(Self {
            timestamp_ms: field(fields, 0, "timestamp")?,
            fear_greed_index: field(fields, 1, "fear_greed_index")?,
        })
    }

    fn at_timestamp(&self, timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            ..*self
        }
    }
}

/// One row of the merged open-interest + funding-rate table.
///
/// `funding_rate` is `None` for grid timestamps before the first funding
/// settlement; the cell is left empty in the persisted form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuturesRow {
    /// Observation time (epoch milliseconds), on the open-interest grid.
    pub timestamp_ms: i64,
    /// Outstanding contract interest.
    pub open_interest: f64,
    /// Most recent funding rate at or before this timestamp, if any.
    pub funding_rate: Option<f64>,
}

impl SeriesRow for FuturesRow {
    const COLUMNS: &'static [&'static str] = &["timestamp", "open_interest", "funding_rate"];

    fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.timestamp_ms.to_string(),
            self.open_interest.to_string(),
            self.funding_rate.map(|r| r.to_string()).unwrap_or_default(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self> {
        expect_width(fields, Self::COLUMNS.len())?;
        let funding_rate = if fields[2].is_empty() {
            None
        } else {
            Some(field(fields, 2, "funding_rate")?)
        };
        Ok(Self {
            timestamp_ms: field(fields, 0, "timestamp")?,
            open_interest: field(fields, 1, "open_interest")?,
            funding_rate,
        })
    }

    fn at_timestamp(&self, timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_field_round_trip() {
        let candle = Candle {
            timestamp_ms: 1_704_067_200_000,
            open: 42000.5,
            high: 42100.0,
            low: 41900.25,
            close: 42050.0,
            volume: 1234.5,
            turnover: 51_900_000.0,
        };
        let fields = candle.to_fields();
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        assert_eq!(Candle::from_fields(&refs).unwrap(), candle);
    }

    #[test]
    fn test_futures_row_empty_funding_cell() {
        let row = FuturesRow {
            timestamp_ms: 1000,
            open_interest: 5.5,
            funding_rate: None,
        };
        assert_eq!(row.to_fields(), vec!["1000", "5.5", ""]);

        let parsed = FuturesRow::from_fields(&["1000", "5.5", ""]).unwrap();
        assert_eq!(parsed, row);

        let parsed = FuturesRow::from_fields(&["1000", "5.5", "0.0001"]).unwrap();
        assert_eq!(parsed.funding_rate, Some(0.0001));
    }

    #[test]
    fn test_from_fields_rejects_wrong_width() {
        assert!(matches!(
            OpenInterest::from_fields(&["1000"]),
            Err(HumboldtError::Store(_))
        ));
    }

    #[test]
    fn test_from_fields_rejects_bad_value() {
        let err = FundingRate::from_fields(&["1000", "not-a-number"]).unwrap_err();
        assert!(err.to_string().contains("funding_rate"));
    }

    #[test]
    fn test_at_timestamp_rekeys() {
        let reading = FearGreed {
            timestamp_ms: 1000,
            fear_greed_index: 61,
        };
        let moved = reading.at_timestamp(2000);
        assert_eq!(moved.timestamp_ms, 2000);
        assert_eq!(moved.fear_greed_index, 61);
    }
}
