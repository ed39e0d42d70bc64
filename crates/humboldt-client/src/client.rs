//! HTTP client for the upstream market APIs.

use std::time::Duration;

use humboldt_types::{Category, HumboldtError, Interval, RawRecord, Result, TimeRange};
use tracing::debug;

use crate::{
    Cursor, Endpoint, Page, PageQuery,
    envelope::{BybitEnvelope, FearGreedEnvelope},
};

/// Configuration for the market client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Bybit v5 API.
    pub base_url: String,
    /// URL of the alternative.me Fear & Greed API.
    pub fear_greed_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.bybit.com".to_string(),
            fear_greed_url: "https://api.alternative.me/fng/".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("humboldt/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client issuing one request per call.
///
/// The client performs no pacing or retries of its own; callers own both
/// (the pagination driver paces rounds, and a failed sweep is recovered
/// by rerunning it).
#[derive(Debug, Clone)]
pub struct MarketClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl MarketClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { http, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> std::result::Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches one page from a paginated Bybit endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HumboldtError::Transport`] on network failure,
    /// [`HumboldtError::Api`] when the envelope's `retCode` is non-zero,
    /// and [`HumboldtError::Schema`] when the envelope shape is wrong.
    pub async fn fetch_page(
        &self,
        endpoint: Endpoint,
        query: &PageQuery,
        cursor: Option<&Cursor>,
    ) -> Result<Page> {
        let url = format!("{}{}", self.config.base_url, endpoint.path());
        let mut params = query.params(endpoint);
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.as_str().to_string()));
        }

        debug!(endpoint = %endpoint, symbol = %query.symbol, cursor = ?cursor, "requesting page");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| HumboldtError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| HumboldtError::Transport(e.to_string()))?;

        let envelope: BybitEnvelope = response
            .json()
            .await
            .map_err(|e| HumboldtError::Schema(format!("invalid envelope: {e}")))?;
        let page = envelope.into_page()?;

        debug!(endpoint = %endpoint, records = page.len(), "received page");
        Ok(page)
    }

    /// Answers whether at least one record exists in `[start_ms, end_ms)`.
    ///
    /// This is the bounded single-record existence query used by the
    /// history prober. Transport and API failures propagate; only a clean
    /// empty page means "no data".
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::fetch_page`].
    pub async fn exists_within(
        &self,
        endpoint: Endpoint,
        category: Category,
        symbol: &str,
        interval: Option<Interval>,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<bool> {
        let query = PageQuery {
            category,
            symbol: symbol.to_string(),
            interval,
            range: TimeRange::new(start_ms, end_ms.saturating_sub(1).max(start_ms))?,
            limit: 1,
        };
        let page = self.fetch_page(endpoint, &query, None).await?;
        Ok(!page.is_empty())
    }

    /// Fetches the complete Fear & Greed index history.
    ///
    /// The alternative.me API is not paginated; `limit=0` returns all
    /// readings in one response.
    ///
    /// # Errors
    ///
    /// Returns [`HumboldtError::Transport`] on network failure,
    /// [`HumboldtError::Api`] when the envelope reports an error, and
    /// [`HumboldtError::Schema`] when the `data` array is absent.
    pub async fn fetch_fear_greed(&self) -> Result<Vec<RawRecord>> {
        debug!(url = %self.config.fear_greed_url, "requesting fear & greed history");

        let response = self
            .http
            .get(&self.config.fear_greed_url)
            .query(&[("limit", "0"), ("format", "json")])
            .send()
            .await
            .map_err(|e| HumboldtError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| HumboldtError::Transport(e.to_string()))?;

        let envelope: FearGreedEnvelope = response
            .json()
            .await
            .map_err(|e| HumboldtError::Schema(format!("invalid envelope: {e}")))?;
        let records = envelope.into_records()?;

        debug!(records = records.len(), "received fear & greed history");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.bybit.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("humboldt/"));
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = MarketClient::with_defaults();
        assert!(client.is_ok());
    }
}
