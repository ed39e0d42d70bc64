//! Fetch command implementation.
//!
//! Brings one canonical dataset table up to the present moment.

use crate::dataset::Dataset;
use anyhow::{Context, Result};
use humboldt_lib::prelude::*;
use humboldt_lib::parse_timestamp;
use std::path::Path;

/// Synchronize a dataset table.
pub(crate) async fn fetch(
    dataset: Dataset,
    symbol: &str,
    category_str: &str,
    interval_str: &str,
    start_str: Option<&str>,
    data_dir: &Path,
    binary_probe: bool,
) -> Result<()> {
    let category: Category = category_str
        .parse()
        .with_context(|| format!("Invalid category: {category_str}"))?;
    let interval: Interval = interval_str
        .parse()
        .with_context(|| format!("Invalid interval: {interval_str}"))?;
    let start = start_str
        .map(parse_timestamp)
        .transpose()
        .with_context(|| format!("Invalid start bound: {}", start_str.unwrap_or_default()))?;

    let config = SyncConfig {
        symbol: symbol.to_string(),
        category,
        interval,
        probe_strategy: if binary_probe {
            ProbeStrategy::Binary
        } else {
            ProbeStrategy::Linear
        },
        ..SyncConfig::default()
    };
    let client = MarketClient::with_defaults().context("Failed to create HTTP client")?;
    let sync = Synchronizer::new(client, config);

    let table = dataset.table_path(data_dir, symbol);
    let now_ms = chrono::Utc::now().timestamp_millis();

    let outcome = match dataset {
        Dataset::Candles => {
            sync.sync_candles(&CsvStore::new(&table), start, now_ms).await?
        }
        Dataset::OpenInterest => {
            sync.sync_open_interest(&CsvStore::new(&table), start, now_ms)
                .await?
        }
        Dataset::FundingRate => {
            sync.sync_funding(&CsvStore::new(&table), start, now_ms).await?
        }
        Dataset::FearGreed => sync.sync_fear_greed(&CsvStore::new(&table)).await?,
    };

    if outcome.range.is_none() && outcome.fetched == 0 {
        println!("{}: already up to date", dataset.name());
    } else {
        println!(
            "{}: fetched {} rows, {} new -> {}",
            dataset.name(),
            outcome.fetched,
            outcome.appended,
            table.display()
        );
    }
    Ok(())
}
