//! Durable CSV dataset store for humboldt.
//!
//! This crate owns the canonical on-disk tables:
//!
//! - [`CsvStore`] - read / append-merge-dedup / inclusive range queries
//! - [`write_rows`] - atomic write-to-temp-then-rename table writer
//! - [`export_range`] / [`export_file_name`] - derived range artifacts

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod export;
mod store;

pub use export::{export_file_name, export_range};
pub use store::{CsvStore, write_rows};
