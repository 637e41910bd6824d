//! Beatmapset collection module.
//!
//! This module provides:
//! - Category pagination driven by profile-declared counts
//! - Deduplicated aggregation across categories
//! - Recursive favourites expansion over the user graph

pub mod aggregate;
pub mod recursive;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{page_count, AggregationResult, Aggregator, PagePolicy};
pub use recursive::{union, UserFavourites, Walker};
