//! Common traits for the Pokedex crates.
//!
//! These traits sit between the cache, the HTTP client and the REPL so each
//! side can be swapped out in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{LocationArea, LocationAreaPage, Pokemon};

// ═══════════════════════════════════════════════════════════════════════════════
// RESPONSE CACHE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Byte-blob store consulted before every remote lookup.
///
/// Keys are request URLs, values are raw response bodies. Implementations
/// must be safe to call from many tasks at once and must hand out owned
/// copies so callers can never mutate cached payloads.
pub trait ResponseCache: Send + Sync {
    /// Returns a copy of the bytes stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn put(&self, key: &str, value: Vec<u8>);
}

// ═══════════════════════════════════════════════════════════════════════════════
// CATALOG SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for looking up catalog records.
///
/// The production implementation talks to PokeAPI through the response
/// cache; the REPL only depends on this trait.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches one page of location areas.
    ///
    /// `page_url` is a `next`/`previous` link from an earlier page; `None`
    /// requests the first page.
    async fn location_areas(&self, page_url: Option<&str>) -> Result<LocationAreaPage>;

    /// Fetches a single location area by name.
    async fn location_area(&self, name: &str) -> Result<LocationArea>;

    /// Fetches a single Pokemon by name.
    async fn pokemon(&self, name: &str) -> Result<Pokemon>;
}
