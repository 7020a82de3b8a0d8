//! Error types for the Pokedex crates.
//!
//! One error hierarchy built with `thiserror`, shared by the cache, the API
//! client and the CLI.

use thiserror::Error;

/// Result type alias using `PokedexError`.
pub type Result<T> = std::result::Result<T, PokedexError>;

/// Main error type for all Pokedex operations.
#[derive(Debug, Error)]
pub enum PokedexError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The cache was constructed with a zero time-to-live.
    #[error("Invalid cache TTL: {0:?} (must be greater than zero)")]
    InvalidTtl(std::time::Duration),

    /// The background sweep task could not be started.
    #[error("Failed to start cache sweep task: {0}")]
    SweepStartFailed(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The server answered with a non-success status.
    #[error("Request to '{url}' failed with status {status}")]
    HttpStatus { status: u16, url: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl PokedexError {
    /// Returns true if this error is recoverable (can retry).
    pub fn is_recoverable(&self) -> bool {
        match self {
            PokedexError::HttpError(_) => true,
            PokedexError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
