//! Expiring response cache for the Pokedex client.
//!
//! Stores raw response bodies keyed by request URL. A background task sweeps
//! out entries older than the configured TTL until the cache is shut down
//! or dropped.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;

pub use cache::{CacheConfig, CacheStats, ExpiringCache};
