//! Series normalization and the merge/resample engine for humboldt.
//!
//! This crate turns raw upstream records into canonical series and
//! reconciles heterogeneous-interval series onto shared timestamp axes:
//!
//! - [`normalize_open_interest`] / [`normalize_funding`] /
//!   [`normalize_klines`] / [`normalize_fear_greed`] - raw records to
//!   typed, sorted, deduplicated rows
//! - [`sort_dedup`] - the shared sort-ascending, last-seen-wins pass
//! - [`merge_forward_fill`] - outer join + forward-fill on the left grid
//! - [`resample_forward_fill`] - fixed-frequency forward-fill upsample

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod merge;
mod normalize;
mod resample;

pub use merge::merge_forward_fill;
pub use normalize::{
    normalize_fear_greed, normalize_funding, normalize_klines, normalize_open_interest, sort_dedup,
};
pub use resample::resample_forward_fill;
