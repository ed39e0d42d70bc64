//! Merge command implementation.
//!
//! Joins the open-interest and funding-rate tables into one futures table
//! on the open-interest timestamp grid, forward-filling the sparser
//! funding settlements, and exports the requested slice.

use anyhow::{Context, Result, bail};
use humboldt_lib::prelude::*;
use humboldt_lib::{export_file_name, write_rows};
use std::path::Path;

/// Export a merged futures slice.
pub(crate) fn merge(
    start_str: &str,
    end_str: &str,
    symbol: &str,
    data_dir: &Path,
    out_dir: &Path,
) -> Result<()> {
    let range = TimeRange::from_strings(start_str, end_str)
        .with_context(|| format!("Invalid range: {start_str} - {end_str}"))?;

    let open_interest = CsvStore::<OpenInterest>::new(
        data_dir.join(format!("open_interest_{symbol}.csv")),
    )
    .read()?;
    let funding =
        CsvStore::<FundingRate>::new(data_dir.join(format!("funding_rate_{symbol}.csv"))).read()?;

    // Merge over the full tables so forward fill can carry a settlement
    // from before the requested slice, then cut the slice.
    let rows: Vec<FuturesRow> = merge_forward_fill(&open_interest, &funding)
        .into_iter()
        .filter(|row| range.contains(row.timestamp_ms))
        .collect();
    if rows.is_empty() {
        bail!("no rows in {start_str} - {end_str}; fetch open-interest first");
    }

    let path = out_dir.join(export_file_name("futures_data", Some(symbol), range)?);
    write_rows(&path, &rows)?;

    println!("merged {} rows -> {}", rows.len(), path.display());
    Ok(())
}
