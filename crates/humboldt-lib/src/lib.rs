//! Incremental synchronizer for Bybit market history and sentiment data.
//!
//! This is a facade crate that re-exports functionality from the humboldt
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use humboldt_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MarketClient::with_defaults()?;
//!     let sync = Synchronizer::new(client, SyncConfig::default());
//!
//!     let store = CsvStore::new("data/open_interest_BTCUSDT.csv");
//!     let now_ms = chrono::Utc::now().timestamp_millis();
//!     let outcome = sync.sync_open_interest(&store, None, now_ms).await?;
//!     println!("appended {} rows", outcome.appended);
//!
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use humboldt_types::*;

// Re-export the HTTP client
pub use humboldt_client::{ClientConfig, Cursor, Endpoint, MarketClient, Page, PageQuery};

// Re-export series transforms
pub use humboldt_series::{
    merge_forward_fill, normalize_fear_greed, normalize_funding, normalize_klines,
    normalize_open_interest, resample_forward_fill, sort_dedup,
};

// Re-export the dataset store
pub use humboldt_store::{CsvStore, export_file_name, export_range, write_rows};

// Re-export the synchronization engine
pub use humboldt_sync::{
    BybitPageSource, BybitProbeSource, HistoryProber, PageSource, PaginationDriver, ProbeSource,
    ProbeStrategy, SyncConfig, SyncOutcome, Synchronizer,
};

/// Prelude module for convenient imports.
///
/// ```
/// use humboldt_lib::prelude::*;
/// ```
pub mod prelude {
    pub use humboldt_types::{
        Candle, Category, FearGreed, FundingRate, FuturesRow, HumboldtError, Interval,
        OpenInterest, Result, SeriesRow, TimeRange,
    };

    pub use humboldt_client::{ClientConfig, Endpoint, MarketClient};

    pub use humboldt_series::{merge_forward_fill, resample_forward_fill};

    pub use humboldt_store::{CsvStore, export_range};

    pub use humboldt_sync::{ProbeStrategy, SyncConfig, SyncOutcome, Synchronizer};
}
