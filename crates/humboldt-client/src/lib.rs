//! HTTP page fetcher for the humboldt market data synchronizer.
//!
//! This crate owns the upstream API boundary:
//!
//! - [`MarketClient`] - one outbound request per call, no pacing or retries
//! - [`Endpoint`] / [`PageQuery`] - the Bybit v5 market endpoint catalogue
//! - [`Page`] / [`Cursor`] - the pagination primitives handed to the driver
//!
//! Envelope validation happens here: a non-zero `retCode` becomes an API
//! error, a missing `result.list` becomes a schema error, and network
//! failures become transport errors.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod endpoint;
mod envelope;

pub use client::{ClientConfig, MarketClient};
pub use endpoint::{Endpoint, PageQuery};
pub use envelope::{Cursor, Page};
