//! Dataset-level incremental synchronization.

use std::time::Duration;

use humboldt_client::{Endpoint, MarketClient, PageQuery};
use humboldt_series::{
    normalize_fear_greed, normalize_funding, normalize_klines, normalize_open_interest,
};
use humboldt_store::CsvStore;
use humboldt_types::{
    Candle, Category, FearGreed, FundingRate, Interval, OpenInterest, RawRecord, Result,
    SeriesRow, TimeRange,
};
use tracing::info;

use crate::{
    BybitPageSource, BybitProbeSource, HistoryProber, PaginationDriver, ProbeStrategy,
};

/// Tunables of one synchronizer instance.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Trading pair, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Contract category.
    pub category: Category,
    /// Sampling interval for candles and open interest.
    pub interval: Interval,
    /// Earliest year the history prober will consider.
    pub floor_year: i32,
    /// Page size for open interest and funding sweeps.
    pub page_limit: u32,
    /// Page size for kline sweeps (the endpoint allows a larger one).
    pub kline_page_limit: u32,
    /// Pacing delay between pagination rounds.
    pub page_delay: Duration,
    /// Hard cap on rounds per sweep.
    pub max_rounds: u32,
    /// History-probe search strategy.
    pub probe_strategy: ProbeStrategy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            category: Category::Linear,
            interval: Interval::Day1,
            floor_year: 2018,
            page_limit: 200,
            kline_page_limit: 1000,
            page_delay: Duration::from_millis(120),
            max_rounds: 10_000,
            probe_strategy: ProbeStrategy::Linear,
        }
    }
}

/// What one synchronization pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Rows obtained upstream (after normalization).
    pub fetched: usize,
    /// Net rows added to the store; smaller than `fetched` when the
    /// sweep overlapped already-persisted history.
    pub appended: usize,
    /// The swept bounds, `None` when the store was already current.
    pub range: Option<TimeRange>,
}

impl SyncOutcome {
    /// An outcome for a pass that had nothing to do.
    #[must_use]
    pub const fn up_to_date() -> Self {
        Self {
            fetched: 0,
            appended: 0,
            range: None,
        }
    }
}

/// Chooses the sweep start from local state, without touching the network.
///
/// A persisted baseline always wins: the sweep resumes just after the
/// newest stored timestamp. Otherwise an explicit override is used.
/// `None` means the caller must probe upstream for the earliest history.
#[must_use]
pub const fn resolve_start(last_stored: Option<i64>, start_override: Option<i64>) -> Option<i64> {
    match (last_stored, start_override) {
        (Some(last), _) => Some(last + 1),
        (None, Some(start)) => Some(start),
        (None, None) => None,
    }
}

/// Orchestrates incremental dataset synchronization.
///
/// Each `sync_*` method brings one canonical table up to `now`: it picks
/// the sweep start (resume, override, or probe), paginates the upstream
/// endpoint to exhaustion, normalizes, and merge-appends into the store.
/// A failed pass leaves the table untouched; rerunning it is safe because
/// appends deduplicate by timestamp.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    client: MarketClient,
    config: SyncConfig,
}

impl Synchronizer {
    /// Creates a synchronizer over the given client and configuration.
    #[must_use]
    pub const fn new(client: MarketClient, config: SyncConfig) -> Self {
        Self { client, config }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Synchronizes the price-candle table up to `now_ms`.
    ///
    /// # Errors
    ///
    /// Propagates client, normalization, and store failures; the table is
    /// only written after the whole sweep succeeds.
    pub async fn sync_candles(
        &self,
        store: &CsvStore<Candle>,
        start_override: Option<i64>,
        now_ms: i64,
    ) -> Result<SyncOutcome> {
        let endpoint = Endpoint::Kline;
        let Some(start) = self
            .sweep_start(endpoint, store.last_timestamp()?, start_override, now_ms)
            .await?
        else {
            return Ok(SyncOutcome::up_to_date());
        };
        let records = self
            .sweep(endpoint, self.config.kline_page_limit, start, now_ms)
            .await?;
        let rows = normalize_klines(&records)?;
        self.finish("candles", store, rows, start, now_ms)
    }

    /// Synchronizes the open-interest table up to `now_ms`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::sync_candles`].
    pub async fn sync_open_interest(
        &self,
        store: &CsvStore<OpenInterest>,
        start_override: Option<i64>,
        now_ms: i64,
    ) -> Result<SyncOutcome> {
        let endpoint = Endpoint::OpenInterest;
        let Some(start) = self
            .sweep_start(endpoint, store.last_timestamp()?, start_override, now_ms)
            .await?
        else {
            return Ok(SyncOutcome::up_to_date());
        };
        let records = self
            .sweep(endpoint, self.config.page_limit, start, now_ms)
            .await?;
        let rows = normalize_open_interest(&records)?;
        self.finish("open_interest", store, rows, start, now_ms)
    }

    /// Synchronizes the funding-rate table up to `now_ms`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::sync_candles`].
    pub async fn sync_funding(
        &self,
        store: &CsvStore<FundingRate>,
        start_override: Option<i64>,
        now_ms: i64,
    ) -> Result<SyncOutcome> {
        let endpoint = Endpoint::FundingHistory;
        let Some(start) = self
            .sweep_start(endpoint, store.last_timestamp()?, start_override, now_ms)
            .await?
        else {
            return Ok(SyncOutcome::up_to_date());
        };
        let records = self
            .sweep(endpoint, self.config.page_limit, start, now_ms)
            .await?;
        let rows = normalize_funding(&records)?;
        self.finish("funding_rate", store, rows, start, now_ms)
    }

    /// Synchronizes the Fear & Greed index table.
    ///
    /// The upstream returns its full history in one response, so the pass
    /// fetches everything and keeps only the readings newer than the
    /// stored baseline.
    ///
    /// # Errors
    ///
    /// Propagates client, normalization, and store failures.
    pub async fn sync_fear_greed(&self, store: &CsvStore<FearGreed>) -> Result<SyncOutcome> {
        let start = store.last_timestamp()?.map_or(0, |last| last + 1);
        let records = self.client.fetch_fear_greed().await?;
        let rows = normalize_fear_greed(&records, start)?;

        let fetched = rows.len();
        let range = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => {
                Some(TimeRange::new(first.timestamp_ms, last.timestamp_ms)?)
            }
            _ => None,
        };
        let appended = store.append(rows)?;
        info!(dataset = "fear_greed_index", fetched, appended, "pass complete");
        Ok(SyncOutcome {
            fetched,
            appended,
            range,
        })
    }

    /// Resolves the sweep start, probing upstream when local state gives
    /// no answer. `None` means the store is already current.
    async fn sweep_start(
        &self,
        endpoint: Endpoint,
        last_stored: Option<i64>,
        start_override: Option<i64>,
        now_ms: i64,
    ) -> Result<Option<i64>> {
        let start = match resolve_start(last_stored, start_override) {
            Some(start) => start,
            None => {
                let prober =
                    HistoryProber::new(self.config.floor_year, self.config.probe_strategy);
                let source = BybitProbeSource::new(
                    &self.client,
                    endpoint,
                    self.config.category,
                    self.config.symbol.clone(),
                    self.interval_for(endpoint),
                );
                prober.earliest(&source, now_ms).await?
            }
        };
        Ok((start <= now_ms).then_some(start))
    }

    /// Runs one pagination sweep over `[start_ms, now_ms]`.
    async fn sweep(
        &self,
        endpoint: Endpoint,
        limit: u32,
        start_ms: i64,
        now_ms: i64,
    ) -> Result<Vec<RawRecord>> {
        let query = PageQuery {
            category: self.config.category,
            symbol: self.config.symbol.clone(),
            interval: self.interval_for(endpoint),
            range: TimeRange::new(start_ms, now_ms)?,
            limit,
        };
        let source = BybitPageSource::new(&self.client, endpoint, query);
        let driver = PaginationDriver::new(self.config.page_delay, self.config.max_rounds);
        driver.run(&source).await
    }

    /// Merge-appends normalized rows and reports the pass.
    fn finish<R: SeriesRow>(
        &self,
        dataset: &str,
        store: &CsvStore<R>,
        rows: Vec<R>,
        start_ms: i64,
        now_ms: i64,
    ) -> Result<SyncOutcome> {
        let fetched = rows.len();
        let appended = store.append(rows)?;
        info!(
            dataset,
            symbol = %self.config.symbol,
            fetched,
            appended,
            "pass complete"
        );
        Ok(SyncOutcome {
            fetched,
            appended,
            range: Some(TimeRange::new(start_ms, now_ms)?),
        })
    }

    /// The interval parameter each endpoint takes, if any.
    const fn interval_for(&self, endpoint: Endpoint) -> Option<Interval> {
        match endpoint {
            Endpoint::Kline | Endpoint::OpenInterest => Some(self.config.interval),
            Endpoint::FundingHistory => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_start_resumes_after_baseline() {
        // A stored baseline beats any override.
        assert_eq!(resolve_start(Some(5000), None), Some(5001));
        assert_eq!(resolve_start(Some(5000), Some(1000)), Some(5001));
    }

    #[test]
    fn test_resolve_start_uses_override_when_empty() {
        assert_eq!(resolve_start(None, Some(1000)), Some(1000));
    }

    #[test]
    fn test_resolve_start_requests_probe_when_nothing_known() {
        assert_eq!(resolve_start(None, None), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.symbol, "BTCUSDT");
        assert_eq!(config.category, Category::Linear);
        assert_eq!(config.interval, Interval::Day1);
        assert_eq!(config.floor_year, 2018);
        assert_eq!(config.page_limit, 200);
        assert_eq!(config.kline_page_limit, 1000);
        assert_eq!(config.page_delay, Duration::from_millis(120));
        assert_eq!(config.probe_strategy, ProbeStrategy::Linear);
    }

    #[test]
    fn test_up_to_date_outcome() {
        let outcome = SyncOutcome::up_to_date();
        assert_eq!(outcome.fetched, 0);
        assert_eq!(outcome.appended, 0);
        assert!(outcome.range.is_none());
    }
}
