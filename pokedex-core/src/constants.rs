//! Endpoints and default tuning values.

// ═══════════════════════════════════════════════════════════════════════════════
// POKEAPI
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the public PokeAPI v2.
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Path of the paginated location-area listing (and of single areas below it).
pub const LOCATION_AREA_PATH: &str = "location-area";

/// Path of single Pokemon records.
pub const POKEMON_PATH: &str = "pokemon";

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("pokedex-cli/", env!("CARGO_PKG_VERSION"));

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

// ═══════════════════════════════════════════════════════════════════════════════
// RESPONSE CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// How long a cached response body is kept, in seconds.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;
