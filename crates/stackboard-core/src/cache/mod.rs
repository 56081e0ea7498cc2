//! In-memory caching of catalog reads.
//!
//! This module provides the `CatalogCache` so repeated views of the same
//! listing do not hit the API again. Entries are considered stale after
//! 5 minutes and are dropped whenever the session ends. Nothing is written
//! to disk; the cache is for processes that keep a `CatalogClient` around.

pub mod manager;

pub use manager::{CachedData, CatalogCache};
