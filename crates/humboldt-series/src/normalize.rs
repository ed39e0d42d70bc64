//! Raw record normalization.
//!
//! Converts the heterogeneous upstream record shapes into typed rows:
//! fields are mapped by fixed name (or kline array position), timestamps
//! are coerced to integer epoch milliseconds, values to their numeric
//! types, and the result is sorted ascending and deduplicated by
//! timestamp.
//!
//! A missing or malformed required field aborts the whole batch with a
//! schema error; rows are never silently skipped.

use humboldt_types::{
    Candle, FearGreed, FundingRate, HumboldtError, OpenInterest, RawRecord, Result, SeriesRow,
};

/// Sorts rows ascending by timestamp and drops duplicate timestamps.
///
/// Last-seen wins: upstream pages are visited in one ascending sweep, so
/// duplicates only arise at page boundaries and carry identical values.
#[must_use]
pub fn sort_dedup<R: SeriesRow>(mut rows: Vec<R>) -> Vec<R> {
    rows.sort_by_key(SeriesRow::timestamp_ms);
    let mut out: Vec<R> = Vec::with_capacity(rows.len());
    for row in rows {
        match out.last_mut() {
            Some(prev) if prev.timestamp_ms() == row.timestamp_ms() => *prev = row,
            _ => out.push(row),
        }
    }
    out
}

/// Normalizes raw open-interest records.
///
/// Expected shape: `{"openInterest": "<f64>", "timestamp": "<ms>"}`.
///
/// # Errors
///
/// Returns [`HumboldtError::Schema`] if any record is missing a required
/// field; the whole batch is rejected.
pub fn normalize_open_interest(records: &[RawRecord]) -> Result<Vec<OpenInterest>> {
    let rows = records
        .iter()
        .map(|record| {
            Ok(OpenInterest {
                timestamp_ms: int_field(record, "timestamp")?,
                open_interest: float_field(record, "openInterest")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(sort_dedup(rows))
}

/// Normalizes raw funding-rate records.
///
/// Expected shape: `{"fundingRate": "<f64>", "fundingRateTimestamp": "<ms>"}`.
///
/// # Errors
///
/// Returns [`HumboldtError::Schema`] if any record is missing a required
/// field; the whole batch is rejected.
pub fn normalize_funding(records: &[RawRecord]) -> Result<Vec<FundingRate>> {
    let rows = records
        .iter()
        .map(|record| {
            Ok(FundingRate {
                timestamp_ms: int_field(record, "fundingRateTimestamp")?,
                funding_rate: float_field(record, "fundingRate")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(sort_dedup(rows))
}

/// Normalizes raw kline records.
///
/// Klines are positional string arrays:
/// `[start, open, high, low, close, volume, turnover]`.
///
/// # Errors
///
/// Returns [`HumboldtError::Schema`] if any record is not an array of at
/// least seven string elements; the whole batch is rejected.
pub fn normalize_klines(records: &[RawRecord]) -> Result<Vec<Candle>> {
    let rows = records
        .iter()
        .map(|record| {
            let items = record
                .as_array()
                .ok_or_else(|| HumboldtError::Schema("kline record is not an array".to_string()))?;
            Ok(Candle {
                timestamp_ms: kline_item(items, 0)?,
                open: kline_item(items, 1)?,
                high: kline_item(items, 2)?,
                low: kline_item(items, 3)?,
                close: kline_item(items, 4)?,
                volume: kline_item(items, 5)?,
                turnover: kline_item(items, 6)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(sort_dedup(rows))
}

/// Normalizes raw Fear & Greed readings, keeping those at or after
/// `start_ms`.
///
/// Expected shape: `{"value": "<0..100>", "timestamp": "<seconds>"}`; the
/// upstream epoch is in seconds and is widened to milliseconds here.
///
/// # Errors
///
/// Returns [`HumboldtError::Schema`] if any record is missing a required
/// field; the whole batch is rejected.
pub fn normalize_fear_greed(records: &[RawRecord], start_ms: i64) -> Result<Vec<FearGreed>> {
    let rows = records
        .iter()
        .map(|record| {
            Ok(FearGreed {
                timestamp_ms: int_field(record, "timestamp")? * 1000,
                fear_greed_index: int_field(record, "value")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let rows = rows
        .into_iter()
        .filter(|row| row.timestamp_ms >= start_ms)
        .collect();
    Ok(sort_dedup(rows))
}

/// Extracts a string-or-number field as text, by fixed name.
fn text_field<'a>(record: &'a RawRecord, name: &str) -> Result<std::borrow::Cow<'a, str>> {
    let value = record
        .get(name)
        .ok_or_else(|| HumboldtError::Schema(format!("record is missing field '{name}'")))?;
    match value {
        serde_json::Value::String(s) => Ok(std::borrow::Cow::Borrowed(s)),
        serde_json::Value::Number(n) => Ok(std::borrow::Cow::Owned(n.to_string())),
        _ => Err(HumboldtError::Schema(format!(
            "field '{name}' is not a string or number"
        ))),
    }
}

/// Coerces a named field to an integer.
fn int_field(record: &RawRecord, name: &str) -> Result<i64> {
    let text = text_field(record, name)?;
    text.parse().map_err(|_| {
        HumboldtError::Schema(format!("field '{name}' has non-integer value '{text}'"))
    })
}

/// Coerces a named field to a float.
fn float_field(record: &RawRecord, name: &str) -> Result<f64> {
    let text = text_field(record, name)?;
    text.parse().map_err(|_| {
        HumboldtError::Schema(format!("field '{name}' has non-numeric value '{text}'"))
    })
}

/// Coerces one positional kline element to its numeric type.
fn kline_item<T: std::str::FromStr>(items: &[serde_json::Value], index: usize) -> Result<T> {
    let value = items.get(index).ok_or_else(|| {
        HumboldtError::Schema(format!("kline record has no element {index}"))
    })?;
    let text = value
        .as_str()
        .ok_or_else(|| HumboldtError::Schema(format!("kline element {index} is not a string")))?;
    text.parse().map_err(|_| {
        HumboldtError::Schema(format!("kline element {index} has bad value '{text}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_dedup_orders_and_keeps_last() {
        let rows = vec![
            OpenInterest { timestamp_ms: 3000, open_interest: 3.0 },
            OpenInterest { timestamp_ms: 1000, open_interest: 1.0 },
            OpenInterest { timestamp_ms: 2000, open_interest: 2.0 },
            OpenInterest { timestamp_ms: 1000, open_interest: 9.0 },
        ];
        let out = sort_dedup(rows);
        assert_eq!(out.len(), 3);
        assert!(out.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
        // Duplicate at 1000: the later occurrence wins.
        assert_eq!(out[0].open_interest, 9.0);
    }

    #[test]
    fn test_normalize_open_interest() {
        let records = vec![
            json!({"openInterest": "80000.5", "timestamp": "1704153600000"}),
            json!({"openInterest": "79000.0", "timestamp": "1704067200000"}),
        ];
        let rows = normalize_open_interest(&records).unwrap();
        assert_eq!(rows[0].timestamp_ms, 1_704_067_200_000);
        assert_eq!(rows[0].open_interest, 79000.0);
        assert_eq!(rows[1].open_interest, 80000.5);
    }

    #[test]
    fn test_normalize_rejects_missing_field() {
        let records = vec![
            json!({"openInterest": "80000.5", "timestamp": "1704153600000"}),
            json!({"timestamp": "1704067200000"}),
        ];
        let err = normalize_open_interest(&records).unwrap_err();
        assert!(matches!(err, HumboldtError::Schema(_)));
        assert!(err.to_string().contains("openInterest"));
    }

    #[test]
    fn test_normalize_funding() {
        let records = vec![json!({
            "symbol": "BTCUSDT",
            "fundingRate": "0.0001",
            "fundingRateTimestamp": "1704067200000"
        })];
        let rows = normalize_funding(&records).unwrap();
        assert_eq!(rows[0].funding_rate, 0.0001);
        assert_eq!(rows[0].timestamp_ms, 1_704_067_200_000);
    }

    #[test]
    fn test_normalize_klines() {
        let records = vec![
            json!(["1704153600000", "42250", "42500", "42000", "42400", "1200.5", "50700000"]),
            json!(["1704067200000", "42000", "42300", "41800", "42250", "1500.0", "63100000"]),
        ];
        let rows = normalize_klines(&records).unwrap();
        assert_eq!(rows[0].timestamp_ms, 1_704_067_200_000);
        assert_eq!(rows[0].open, 42000.0);
        assert_eq!(rows[1].close, 42400.0);
    }

    #[test]
    fn test_normalize_klines_rejects_short_record() {
        let records = vec![json!(["1704067200000", "42000"])];
        assert!(matches!(
            normalize_klines(&records),
            Err(HumboldtError::Schema(_))
        ));
    }

    #[test]
    fn test_normalize_fear_greed_widens_and_filters() {
        let records = vec![
            json!({"value": "25", "timestamp": "1704067200"}),
            json!({"value": "61", "timestamp": "1703980800"}),
        ];
        // Keep only readings at or after 2024-01-01.
        let rows = normalize_fear_greed(&records, 1_704_067_200_000).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].timestamp_ms, 1_704_067_200_000);
        assert_eq!(rows[0].fear_greed_index, 25);
    }

    #[test]
    fn test_numeric_json_fields_are_accepted() {
        let records = vec![json!({"value": 61, "timestamp": 1_704_067_200})];
        let rows = normalize_fear_greed(&records, 0).unwrap();
        assert_eq!(rows[0].fear_greed_index, 61);
    }
}
