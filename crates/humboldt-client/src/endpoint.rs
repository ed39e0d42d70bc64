//! Endpoint catalogue and query assembly for the Bybit v5 market API.

use humboldt_types::{Category, Interval, TimeRange};

/// A paginated Bybit v5 market-data endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/v5/market/kline` - price candles.
    Kline,
    /// `/v5/market/open-interest` - open interest history.
    OpenInterest,
    /// `/v5/market/funding/history` - funding-rate settlements.
    FundingHistory,
}

impl Endpoint {
    /// Returns the URL path of the endpoint.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Kline => "/v5/market/kline",
            Self::OpenInterest => "/v5/market/open-interest",
            Self::FundingHistory => "/v5/market/funding/history",
        }
    }

    /// Returns a short identifier for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kline => "kline",
            Self::OpenInterest => "open-interest",
            Self::FundingHistory => "funding-history",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The time-bounded query parameters of one pagination sweep.
///
/// The cursor is deliberately not part of the query; it changes per round
/// and is supplied separately by the pagination driver.
#[derive(Debug, Clone)]
pub struct PageQuery {
    /// Contract category.
    pub category: Category,
    /// Trading pair, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Sampling interval, for the endpoints that take one.
    pub interval: Option<Interval>,
    /// Inclusive time bounds of the sweep.
    pub range: TimeRange,
    /// Maximum records per page.
    pub limit: u32,
}

impl PageQuery {
    /// Renders the query string parameters for the given endpoint.
    ///
    /// The interval parameter is spelled `interval` for klines and
    /// `intervalTime` for open interest; funding history takes none.
    #[must_use]
    pub fn params(&self, endpoint: Endpoint) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("category", self.category.as_str().to_string()),
            ("symbol", self.symbol.clone()),
        ];
        if let Some(interval) = self.interval {
            match endpoint {
                Endpoint::Kline => params.push(("interval", interval.wire_kline().to_string())),
                Endpoint::OpenInterest => {
                    params.push(("intervalTime", interval.wire_interval().to_string()));
                }
                Endpoint::FundingHistory => {}
            }
        }
        params.push(("startTime", self.range.start_ms.to_string()));
        params.push(("endTime", self.range.end_ms.to_string()));
        params.push(("limit", self.limit.to_string()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(interval: Option<Interval>) -> PageQuery {
        PageQuery {
            category: Category::Linear,
            symbol: "BTCUSDT".to_string(),
            interval,
            range: TimeRange::new(1000, 2000).unwrap(),
            limit: 200,
        }
    }

    #[test]
    fn test_open_interest_params() {
        let params = query(Some(Interval::Day1)).params(Endpoint::OpenInterest);
        assert!(params.contains(&("intervalTime", "1d".to_string())));
        assert!(params.contains(&("startTime", "1000".to_string())));
        assert!(params.contains(&("endTime", "2000".to_string())));
        assert!(params.contains(&("limit", "200".to_string())));
    }

    #[test]
    fn test_kline_params_use_kline_spelling() {
        let params = query(Some(Interval::Day1)).params(Endpoint::Kline);
        assert!(params.contains(&("interval", "D".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "intervalTime"));
    }

    #[test]
    fn test_funding_history_has_no_interval() {
        let params = query(Some(Interval::Day1)).params(Endpoint::FundingHistory);
        assert!(!params.iter().any(|(k, _)| *k == "interval" || *k == "intervalTime"));
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Kline.path(), "/v5/market/kline");
        assert_eq!(Endpoint::FundingHistory.path(), "/v5/market/funding/history");
    }
}
