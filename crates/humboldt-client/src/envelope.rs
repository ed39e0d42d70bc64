//! Upstream response envelopes and pagination primitives.

use humboldt_types::{HumboldtError, RawRecord, Result};
use serde::Deserialize;

/// An opaque continuation token issued by the upstream API.
///
/// Cursors carry no meaning beyond equality: a repeated or absent cursor
/// after a non-empty page signals end-of-stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Wraps a raw cursor token.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of raw records plus the continuation cursor, if any.
#[derive(Debug, Clone)]
pub struct Page {
    /// Raw records in upstream order.
    pub records: Vec<RawRecord>,
    /// Cursor for the next page; `None` means the stream is exhausted.
    pub next_cursor: Option<Cursor>,
}

impl Page {
    /// Returns true if the page carries no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in the page.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }
}

/// The Bybit v5 response envelope.
///
/// `retCode != 0` is an application-level error regardless of the HTTP
/// status; a missing `result.list` is a schema violation.
#[derive(Debug, Deserialize)]
pub(crate) struct BybitEnvelope {
    #[serde(rename = "retCode")]
    ret_code: i64,
    #[serde(rename = "retMsg", default)]
    ret_msg: String,
    #[serde(default)]
    result: Option<BybitResult>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct BybitResult {
    #[serde(default)]
    list: Option<Vec<RawRecord>>,
    #[serde(rename = "nextPageCursor", default)]
    next_page_cursor: Option<String>,
}

impl BybitEnvelope {
    /// Validates the envelope and extracts the page.
    pub(crate) fn into_page(self) -> Result<Page> {
        if self.ret_code != 0 {
            return Err(HumboldtError::Api {
                code: self.ret_code,
                message: self.ret_msg,
            });
        }
        let result = self
            .result
            .ok_or_else(|| HumboldtError::Schema("missing 'result' object".to_string()))?;
        let records = result
            .list
            .ok_or_else(|| HumboldtError::Schema("missing 'result.list' array".to_string()))?;
        // Bybit signals exhaustion with an absent or empty cursor string.
        let next_cursor = result
            .next_page_cursor
            .filter(|token| !token.is_empty())
            .map(Cursor::new);
        Ok(Page {
            records,
            next_cursor,
        })
    }
}

/// The alternative.me Fear & Greed envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct FearGreedEnvelope {
    #[serde(default)]
    data: Option<Vec<RawRecord>>,
    #[serde(default)]
    metadata: Option<FearGreedMetadata>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FearGreedMetadata {
    #[serde(default)]
    error: Option<String>,
}

impl FearGreedEnvelope {
    /// Validates the envelope and extracts the readings.
    pub(crate) fn into_records(self) -> Result<Vec<RawRecord>> {
        if let Some(message) = self.metadata.and_then(|m| m.error) {
            return Err(HumboldtError::Api { code: -1, message });
        }
        self.data
            .ok_or_else(|| HumboldtError::Schema("missing 'data' array".to_string()))
    }
}
