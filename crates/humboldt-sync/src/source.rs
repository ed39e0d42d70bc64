//! Production [`PageSource`] and [`ProbeSource`] adapters over the HTTP
//! client.

use async_trait::async_trait;
use humboldt_client::{Cursor, Endpoint, MarketClient, Page, PageQuery};
use humboldt_types::{Category, Interval, Result};

use crate::{PageSource, ProbeSource};

/// A page source bound to one endpoint and one sweep query.
#[derive(Debug)]
pub struct BybitPageSource<'a> {
    client: &'a MarketClient,
    endpoint: Endpoint,
    query: PageQuery,
}

impl<'a> BybitPageSource<'a> {
    /// Binds a client to an endpoint and sweep query.
    #[must_use]
    pub const fn new(client: &'a MarketClient, endpoint: Endpoint, query: PageQuery) -> Self {
        Self {
            client,
            endpoint,
            query,
        }
    }
}

#[async_trait]
impl PageSource for BybitPageSource<'_> {
    async fn fetch(&self, cursor: Option<&Cursor>) -> Result<Page> {
        self.client.fetch_page(self.endpoint, &self.query, cursor).await
    }
}

/// A probe source bound to one endpoint, symbol, and interval.
#[derive(Debug)]
pub struct BybitProbeSource<'a> {
    client: &'a MarketClient,
    endpoint: Endpoint,
    category: Category,
    symbol: String,
    interval: Option<Interval>,
}

impl<'a> BybitProbeSource<'a> {
    /// Binds a client to a probe target.
    #[must_use]
    pub const fn new(
        client: &'a MarketClient,
        endpoint: Endpoint,
        category: Category,
        symbol: String,
        interval: Option<Interval>,
    ) -> Self {
        Self {
            client,
            endpoint,
            category,
            symbol,
            interval,
        }
    }
}

#[async_trait]
impl ProbeSource for BybitProbeSource<'_> {
    async fn exists_within(&self, start_ms: i64, end_ms: i64) -> Result<bool> {
        self.client
            .exists_within(
                self.endpoint,
                self.category,
                &self.symbol,
                self.interval,
                start_ms,
                end_ms,
            )
            .await
    }
}
