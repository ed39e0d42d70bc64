//! Sampling interval definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sampling interval for periodic series (candles, open interest).
///
/// The variants cover the intervals accepted by the Bybit v5 market
/// endpoints; [`Interval::wire_interval`] and [`Interval::wire_kline`]
/// produce the two wire spellings the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// 5-minute sampling.
    #[serde(rename = "5min")]
    Min5,
    /// 15-minute sampling.
    #[serde(rename = "15min")]
    Min15,
    /// 30-minute sampling.
    #[serde(rename = "30min")]
    Min30,
    /// 1-hour sampling.
    #[serde(rename = "1h")]
    Hour1,
    /// 4-hour sampling.
    #[serde(rename = "4h")]
    Hour4,
    /// Daily sampling.
    #[default]
    #[serde(rename = "1d")]
    Day1,
}

impl Interval {
    /// Returns the interval duration in milliseconds.
    #[must_use]
    pub const fn milliseconds(&self) -> i64 {
        match self {
            Self::Min5 => 5 * 60_000,
            Self::Min15 => 15 * 60_000,
            Self::Min30 => 30 * 60_000,
            Self::Hour1 => 3_600_000,
            Self::Hour4 => 4 * 3_600_000,
            Self::Day1 => 86_400_000,
        }
    }

    /// Returns the canonical string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Min5 => "5min",
            Self::Min15 => "15min",
            Self::Min30 => "30min",
            Self::Hour1 => "1h",
            Self::Hour4 => "4h",
            Self::Day1 => "1d",
        }
    }

    /// Returns the `intervalTime` spelling used by the open-interest endpoint.
    #[must_use]
    pub const fn wire_interval(&self) -> &'static str {
        self.as_str()
    }

    /// Returns the `interval` spelling used by the kline endpoint.
    #[must_use]
    pub const fn wire_kline(&self) -> &'static str {
        match self {
            Self::Min5 => "5",
            Self::Min15 => "15",
            Self::Min30 => "30",
            Self::Hour1 => "60",
            Self::Hour4 => "240",
            Self::Day1 => "D",
        }
    }

    /// Returns all supported intervals.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Min5,
            Self::Min15,
            Self::Min30,
            Self::Hour1,
            Self::Hour4,
            Self::Day1,
        ]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "5min" | "5m" | "m5" => Ok(Self::Min5),
            "15min" | "15m" | "m15" => Ok(Self::Min15),
            "30min" | "30m" | "m30" => Ok(Self::Min30),
            "1h" | "h1" | "hour" => Ok(Self::Hour1),
            "4h" | "h4" => Ok(Self::Hour4),
            "1d" | "d1" | "day" | "daily" => Ok(Self::Day1),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: 5min, 15min, 30min, 1h, 4h, 1d",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}

/// Contract category on the derivatives venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// USDT/USDC-margined perpetuals and futures.
    #[default]
    Linear,
    /// Coin-margined (inverse) contracts.
    Inverse,
}

impl Category {
    /// Returns the wire spelling of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Inverse => "inverse",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "inverse" => Ok(Self::Inverse),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid category string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError(String);

impl std::fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid category '{}', expected linear or inverse", self.0)
    }
}

impl std::error::Error for CategoryParseError {}
