//! PokeAPI client implementation.
//!
//! Raw response bodies go through the response cache keyed by URL; decoding
//! into catalog types happens after the cache, so hits never touch the
//! network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use pokedex_core::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT, LOCATION_AREA_PATH,
    POKEMON_PATH,
};
use pokedex_core::error::{PokedexError, Result};
use pokedex_core::traits::{CatalogSource, ResponseCache};
use pokedex_core::types::{LocationArea, LocationAreaPage, Pokemon};

/// Marks a cached non-success response: the prefix, the status code, a
/// newline, then the original body. JSON bodies never start with a NUL byte.
const ERROR_ENVELOPE_PREFIX: &[u8] = b"\0status:";

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API root, e.g. "https://pokeapi.co/api/v2"
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent sent with every request
    pub user_agent: String,
    /// Whether non-success response bodies are cached too
    pub cache_error_responses: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.into(),
            cache_error_responses: false,
        }
    }
}

impl ClientConfig {
    /// Creates config pointing at a different API root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Caches error bodies as well, so failing URLs are not refetched within the TTL.
    pub fn cache_error_responses(mut self, enabled: bool) -> Self {
        self.cache_error_responses = enabled;
        self
    }
}

/// PokeAPI client that checks the response cache before every request.
pub struct PokeApiClient {
    config: ClientConfig,
    base_url: String,
    http_client: reqwest::Client,
    cache: Arc<dyn ResponseCache>,
}

impl PokeApiClient {
    /// Creates a client for the public PokeAPI.
    pub fn new(cache: Arc<dyn ResponseCache>) -> Result<Self> {
        Self::with_config(ClientConfig::default(), cache)
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: ClientConfig, cache: Arc<dyn ResponseCache>) -> Result<Self> {
        let parsed = Url::parse(&config.base_url).map_err(|e| {
            PokedexError::ConfigError(format!("invalid API base URL '{}': {}", config.base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PokedexError::ConfigError(format!(
                "API base URL must be http(s), got '{}'",
                parsed.scheme()
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| PokedexError::HttpError(e.to_string()))?;

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            config,
            http_client,
            cache,
        })
    }

    /// Returns the raw body for `url`, from the cache when present.
    ///
    /// On a miss the body is fetched and stored before it is returned.
    /// Non-success responses are only stored when
    /// [`ClientConfig::cache_error_responses`] is set, together with their
    /// status so a cached failure fails the same way as a live one.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(cached) = self.cache.get(url) {
            debug!(url, bytes = cached.len(), "Cache hit");
            return match cached_error_status(&cached) {
                Some(status) => Err(status_error(status, url)),
                None => Ok(cached),
            };
        }

        debug!(url, "Cache miss, fetching");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PokedexError::HttpError(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PokedexError::HttpError(e.to_string()))?
            .to_vec();

        if status.is_success() {
            self.cache.put(url, body.clone());
            return Ok(body);
        }

        if self.config.cache_error_responses {
            self.cache.put(url, error_envelope(status.as_u16(), &body));
        }
        if status != reqwest::StatusCode::NOT_FOUND {
            warn!(url, status = status.as_u16(), "Request failed");
        }
        Err(status_error(status.as_u16(), url))
    }

    /// Fetches one page of location areas (`None` for the first page).
    pub async fn location_areas(&self, page_url: Option<&str>) -> Result<LocationAreaPage> {
        let url = match page_url {
            Some(url) => url.to_string(),
            None => self.endpoint(LOCATION_AREA_PATH),
        };
        self.fetch_json(&url).await
    }

    /// Fetches a location area by name.
    pub async fn location_area(&self, name: &str) -> Result<LocationArea> {
        let name = normalize_name(name)?;
        let url = self.endpoint(&format!("{LOCATION_AREA_PATH}/{name}"));
        self.fetch_json(&url).await
    }

    /// Fetches a Pokemon by name.
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon> {
        let name = normalize_name(name)?;
        let url = self.endpoint(&format!("{POKEMON_PATH}/{name}"));
        self.fetch_json(&url).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetch(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn location_areas(&self, page_url: Option<&str>) -> Result<LocationAreaPage> {
        PokeApiClient::location_areas(self, page_url).await
    }

    async fn location_area(&self, name: &str) -> Result<LocationArea> {
        PokeApiClient::location_area(self, name).await
    }

    async fn pokemon(&self, name: &str) -> Result<Pokemon> {
        PokeApiClient::pokemon(self, name).await
    }
}

fn status_error(status: u16, url: &str) -> PokedexError {
    if status == reqwest::StatusCode::NOT_FOUND.as_u16() {
        PokedexError::NotFound(url.to_string())
    } else {
        PokedexError::HttpStatus {
            status,
            url: url.to_string(),
        }
    }
}

fn error_envelope(status: u16, body: &[u8]) -> Vec<u8> {
    let mut envelope = ERROR_ENVELOPE_PREFIX.to_vec();
    envelope.extend_from_slice(format!("{status}\n").as_bytes());
    envelope.extend_from_slice(body);
    envelope
}

/// Status code of a cached error envelope, or `None` for a cached success body.
fn cached_error_status(cached: &[u8]) -> Option<u16> {
    let rest = cached.strip_prefix(ERROR_ENVELOPE_PREFIX)?;
    let end = rest.iter().position(|&b| b == b'\n')?;
    std::str::from_utf8(&rest[..end]).ok()?.parse().ok()
}

/// Lowercases a resource name and rejects anything that is not a plain slug.
fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(PokedexError::ValidationError("name cannot be empty".into()));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(PokedexError::ValidationError(format!(
            "invalid name '{name}': only letters, digits and '-' are allowed"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use pokedex_cache::ExpiringCache;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_cache() -> Arc<ExpiringCache> {
        Arc::new(ExpiringCache::new(Duration::from_secs(60)).unwrap())
    }

    fn test_client(server: &MockServer, cache: Arc<ExpiringCache>) -> PokeApiClient {
        PokeApiClient::with_config(ClientConfig::new(server.uri()), cache).unwrap()
    }

    fn pikachu() -> serde_json::Value {
        json!({
            "id": 25,
            "name": "pikachu",
            "base_experience": 112,
            "height": 4,
            "weight": 60,
            "stats": [{"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}}],
            "types": [{"slot": 1, "type": {"name": "electric", "url": ""}}]
        })
    }

    #[tokio::test]
    async fn test_second_lookup_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pikachu()))
            .expect(1)
            .mount(&server)
            .await;

        let cache = test_cache();
        let client = test_client(&server, Arc::clone(&cache));

        let first = client.pokemon("pikachu").await.unwrap();
        let second = client.pokemon("pikachu").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.base_experience, Some(112));
        assert!(cache.get(&format!("{}/pokemon/pikachu", server.uri())).is_some());
    }

    #[tokio::test]
    async fn test_cached_body_skips_network() {
        let server = MockServer::start().await;
        let cache = test_cache();
        let url = format!("{}/pokemon/pikachu", server.uri());
        cache.put(url, serde_json::to_vec(&pikachu()).unwrap());

        let client = test_client(&server, cache);
        let pokemon = client.pokemon("pikachu").await.unwrap();

        assert_eq!(pokemon.name, "pikachu");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_name_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pikachu()))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, test_cache());
        client.pokemon("  PIKACHU ").await.unwrap();
        client.pokemon("pikachu").await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_names_rejected_without_request() {
        let server = MockServer::start().await;
        let client = test_client(&server, test_cache());

        let empty = client.pokemon("   ").await;
        assert!(matches!(empty, Err(PokedexError::ValidationError(_))));

        let traversal = client.location_area("../pokemon").await;
        assert!(matches!(traversal, Err(PokedexError::ValidationError(_))));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/missingno"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(2)
            .mount(&server)
            .await;

        let cache = test_cache();
        let client = test_client(&server, Arc::clone(&cache));

        for _ in 0..2 {
            let result = client.pokemon("missingno").await;
            assert!(matches!(result, Err(PokedexError::NotFound(_))));
        }
        assert_eq!(cache.stats().total_entries, 0);
    }

    fn error_caching_client(server: &MockServer, cache: Arc<ExpiringCache>) -> PokeApiClient {
        let config = ClientConfig::new(server.uri()).cache_error_responses(true);
        PokeApiClient::with_config(config, cache).unwrap()
    }

    #[tokio::test]
    async fn test_cached_not_found_stays_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/missingno"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let cache = test_cache();
        let client = error_caching_client(&server, Arc::clone(&cache));

        for _ in 0..2 {
            let result = client.pokemon("missingno").await;
            assert!(matches!(result, Err(PokedexError::NotFound(_))));
        }
        assert_eq!(cache.stats().total_entries, 1);
    }

    #[tokio::test]
    async fn test_cached_server_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area/eterna-forest-area"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let client = error_caching_client(&server, test_cache());

        for _ in 0..2 {
            let err = client.location_area("eterna-forest-area").await.unwrap_err();
            assert!(matches!(err, PokedexError::HttpStatus { status: 503, .. }));
        }
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[test]
    fn test_error_envelope_status() {
        let envelope = error_envelope(503, b"unavailable");
        assert_eq!(cached_error_status(&envelope), Some(503));
        assert_eq!(cached_error_status(br#"{"name":"ditto"}"#), None);
        assert_eq!(cached_error_status(b""), None);
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area/eterna-forest-area"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = test_client(&server, test_cache());
        let err = client.location_area("eterna-forest-area").await.unwrap_err();

        assert!(matches!(err, PokedexError::HttpStatus { status: 503, .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_location_area_pages() {
        let server = MockServer::start().await;
        let next = format!("{}/location-area?offset=20&limit=20", server.uri());

        Mock::given(method("GET"))
            .and(path("/location-area"))
            .and(query_param("offset", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 22,
                "next": null,
                "previous": format!("{}/location-area?offset=0&limit=20", server.uri()),
                "results": [{"name": "mt-coronet-1f-route-216", "url": ""}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/location-area"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 22,
                "next": next,
                "previous": null,
                "results": [{"name": "canalave-city-area", "url": ""}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, test_cache());

        let first = client.location_areas(None).await.unwrap();
        assert_eq!(first.results[0].name, "canalave-city-area");
        assert_eq!(first.next.as_deref(), Some(next.as_str()));

        let second = client.location_areas(first.next.as_deref()).await.unwrap();
        assert_eq!(second.results[0].name, "mt-coronet-1f-route-216");
        assert!(second.next.is_none());
    }

    #[tokio::test]
    async fn test_invalid_base_url_rejected() {
        let result = PokeApiClient::with_config(ClientConfig::new("not a url"), test_cache());
        assert!(matches!(result, Err(PokedexError::ConfigError(_))));

        let result = PokeApiClient::with_config(ClientConfig::new("ftp://pokeapi.co"), test_cache());
        assert!(matches!(result, Err(PokedexError::ConfigError(_))));
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::default()
            .with_timeout(5)
            .with_user_agent("test-agent")
            .cache_error_responses(true);

        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.user_agent, "test-agent");
        assert!(config.cache_error_responses);
    }
}
