//! CLI command implementations.

pub(crate) mod fetch;
pub(crate) mod get;
pub(crate) mod merge;
