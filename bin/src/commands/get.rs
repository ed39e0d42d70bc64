//! Get command implementation.
//!
//! Exports an inclusive time slice of a canonical table to a derived,
//! deterministically named file. The canonical table is never modified.

use crate::dataset::Dataset;
use anyhow::{Context, Result, bail};
use humboldt_lib::prelude::*;
use humboldt_lib::{export_file_name, write_rows};
use std::path::Path;

/// Export a dataset slice.
pub(crate) fn get(
    dataset: Dataset,
    start_str: &str,
    end_str: &str,
    symbol: &str,
    data_dir: &Path,
    out_dir: &Path,
    four_hour: bool,
) -> Result<()> {
    let range = TimeRange::from_strings(start_str, end_str)
        .with_context(|| format!("Invalid range: {start_str} - {end_str}"))?;
    if four_hour && dataset != Dataset::FearGreed {
        bail!("--four-hour only applies to the fear-greed dataset");
    }

    let table = dataset.table_path(data_dir, symbol);
    let export_symbol = dataset.per_symbol().then_some(symbol);

    let path = match dataset {
        Dataset::Candles => export_range(
            &CsvStore::<Candle>::new(&table),
            range,
            out_dir,
            dataset.name(),
            export_symbol,
        )?,
        Dataset::OpenInterest => export_range(
            &CsvStore::<OpenInterest>::new(&table),
            range,
            out_dir,
            dataset.name(),
            export_symbol,
        )?,
        Dataset::FundingRate => export_range(
            &CsvStore::<FundingRate>::new(&table),
            range,
            out_dir,
            dataset.name(),
            export_symbol,
        )?,
        Dataset::FearGreed if four_hour => {
            let store = CsvStore::<FearGreed>::new(&table);
            let rows = store.range(range.start_ms, range.end_ms)?;
            let resampled = resample_forward_fill(&rows, Interval::Hour4.milliseconds());
            let path = out_dir.join(export_file_name("fear_greed_index_4h", None, range)?);
            write_rows(&path, &resampled)?;
            path
        }
        Dataset::FearGreed => export_range(
            &CsvStore::<FearGreed>::new(&table),
            range,
            out_dir,
            dataset.name(),
            None,
        )?,
    };

    println!("exported -> {}", path.display());
    Ok(())
}
