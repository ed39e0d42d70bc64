//! Error types for humboldt.

use thiserror::Error;

/// Result type alias for humboldt operations.
pub type Result<T> = std::result::Result<T, HumboldtError>;

/// Errors that can occur during synchronization and querying.
#[derive(Error, Debug)]
pub enum HumboldtError {
    /// A date-time string did not match the fixed input format.
    #[error("invalid date-time '{input}': expected DDMMYYYY:HHMM")]
    Format {
        /// The rejected input string.
        input: String,
    },

    /// A time range had its bounds reversed.
    #[error("invalid time range: {start_ms} > {end_ms}")]
    InvalidRange {
        /// Requested start (epoch milliseconds).
        start_ms: i64,
        /// Requested end (epoch milliseconds).
        end_ms: i64,
    },

    /// Network-level failure (connect, timeout, TLS, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The upstream API rejected the request at the application level.
    #[error("API error {code}: {message}")]
    Api {
        /// Upstream status code (`retCode`).
        code: i64,
        /// Upstream message, surfaced verbatim.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("schema error: {0}")]
    Schema(String),

    /// No history exists at or after the probe floor year.
    #[error("no history found at or after year {floor_year}")]
    NoHistory {
        /// The earliest year that was probed.
        floor_year: i32,
    },

    /// A range query matched no rows.
    #[error("no rows in range {start} to {end}")]
    EmptyRange {
        /// Requested start (formatted).
        start: String,
        /// Requested end (formatted).
        end: String,
    },

    /// The pagination safety cap was exceeded without an end-of-stream signal.
    #[error("pagination exceeded the safety cap of {max_rounds} rounds")]
    PaginationLimit {
        /// The configured round cap.
        max_rounds: u32,
    },

    /// A persisted table could not be parsed.
    #[error("store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
