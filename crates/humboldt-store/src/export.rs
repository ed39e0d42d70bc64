//! Range exports: derived, separately-named artifacts.

use std::path::{Path, PathBuf};

use humboldt_types::{Result, SeriesRow, TimeRange, format_timestamp};
use tracing::info;

use crate::{CsvStore, write_rows};

/// Builds the deterministic export file name for a dataset and range.
///
/// Shape: `{dataset}[_{symbol}]_{DDMMYYYYHHMM}-{DDMMYYYYHHMM}.csv`, the
/// bounds rendered in the fixed date format with the colon stripped.
///
/// # Errors
///
/// Returns a format error if a bound is outside the representable range.
pub fn export_file_name(dataset: &str, symbol: Option<&str>, range: TimeRange) -> Result<String> {
    let start = format_timestamp(range.start_ms)?.replace(':', "");
    let end = format_timestamp(range.end_ms)?.replace(':', "");
    Ok(match symbol {
        Some(symbol) => format!("{dataset}_{symbol}_{start}-{end}.csv"),
        None => format!("{dataset}_{start}-{end}.csv"),
    })
}

/// Exports the rows of a store within an inclusive range to a derived
/// file in `dir`, returning the path written.
///
/// The export never touches the canonical table; it produces a separate
/// artifact with the same column shape.
///
/// # Errors
///
/// Returns [`humboldt_types::HumboldtError::EmptyRange`] when no rows
/// match, plus store read and file write failures.
pub fn export_range<R: SeriesRow>(
    store: &CsvStore<R>,
    range: TimeRange,
    dir: &Path,
    dataset: &str,
    symbol: Option<&str>,
) -> Result<PathBuf> {
    let rows = store.range(range.start_ms, range.end_ms)?;
    let path = dir.join(export_file_name(dataset, symbol, range)?);
    write_rows(&path, &rows)?;
    info!(path = %path.display(), rows = rows.len(), "range exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use humboldt_types::FundingRate;

    #[test]
    fn test_export_file_name() {
        let range = TimeRange::from_strings("01012024:0000", "15062024:1345").unwrap();
        assert_eq!(
            export_file_name("funding_rate", Some("BTCUSDT"), range).unwrap(),
            "funding_rate_BTCUSDT_010120240000-150620241345.csv"
        );
        assert_eq!(
            export_file_name("fear_greed_index", None, range).unwrap(),
            "fear_greed_index_010120240000-150620241345.csv"
        );
    }

    #[test]
    fn test_export_range_writes_derived_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store: CsvStore<FundingRate> = CsvStore::new(dir.path().join("funding_rate.csv"));
        store
            .append(vec![
                FundingRate { timestamp_ms: 1_704_067_200_000, funding_rate: 0.0001 },
                FundingRate { timestamp_ms: 1_704_096_000_000, funding_rate: 0.0002 },
            ])
            .unwrap();

        let range = TimeRange::from_strings("01012024:0000", "01012024:0800").unwrap();
        let path = export_range(&store, range, dir.path(), "funding_rate", Some("BTCUSDT")).unwrap();

        assert!(path.ends_with("funding_rate_BTCUSDT_010120240000-010120240800.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "timestamp,funding_rate\n1704067200000,0.0001\n1704096000000,0.0002\n"
        );

        // The canonical table is untouched.
        assert_eq!(store.read().unwrap().len(), 2);
    }
}
