//! Incremental synchronization engine for humboldt.
//!
//! The engine splits one pass into three seams, each mockable in tests:
//!
//! - [`PaginationDriver`] over a [`PageSource`] - cursor-follow sweeps
//! - [`HistoryProber`] over a [`ProbeSource`] - earliest-history search
//! - [`Synchronizer`] - start resolution, sweep, normalize, merge-append
//!
//! [`BybitPageSource`] and [`BybitProbeSource`] bind the seams to the
//! production HTTP client.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod driver;
mod prober;
mod source;
mod synchronizer;

pub use driver::{PageSource, PaginationDriver};
pub use prober::{HistoryProber, ProbeSource, ProbeStrategy};
pub use source::{BybitPageSource, BybitProbeSource};
pub use synchronizer::{SyncConfig, SyncOutcome, Synchronizer, resolve_start};
