//! Core types for the humboldt market data synchronizer.
//!
//! This crate provides the fundamental data structures used throughout
//! humboldt:
//!
//! - [`HumboldtError`] - The workspace-wide error taxonomy
//! - [`parse_timestamp`] / [`format_timestamp`] - The `DDMMYYYY:HHMM` codec
//! - [`TimeRange`] - Inclusive millisecond-epoch ranges
//! - [`Interval`] / [`Category`] - Upstream query parameters
//! - [`SeriesRow`] and the concrete dataset row types

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod interval;
mod row;
mod time;

pub use error::{HumboldtError, Result};
pub use interval::{Category, CategoryParseError, Interval, IntervalParseError};
pub use row::{Candle, FearGreed, FundingRate, FuturesRow, OpenInterest, RawRecord, SeriesRow};
pub use time::{DATE_FORMAT, TimeRange, format_timestamp, parse_timestamp};
