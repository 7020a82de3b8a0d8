//! Pokedex CLI
//!
//! Interactive Pokedex backed by PokeAPI, with an expiring response cache in
//! front of every lookup.

mod commands;
mod repl;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pokedex_api::{ClientConfig, PokeApiClient};
use pokedex_cache::{CacheConfig, ExpiringCache};
use pokedex_core::{DEFAULT_API_BASE_URL, DEFAULT_CACHE_TTL_SECONDS, DEFAULT_TIMEOUT_SECONDS};

use crate::repl::Repl;

/// Pokedex - explore the Pokemon world from your terminal
#[derive(Parser)]
#[command(name = "pokedex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// PokeAPI base URL
    #[arg(long, env = "POKEDEX_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Seconds a cached response stays fresh
    #[arg(long, env = "POKEDEX_CACHE_TTL", default_value_t = DEFAULT_CACHE_TTL_SECONDS)]
    cache_ttl: u64,

    /// Seconds between cache sweeps (defaults to the TTL)
    #[arg(long, env = "POKEDEX_CACHE_SWEEP")]
    cache_sweep: Option<u64>,

    /// Also cache non-success responses
    #[arg(long, env = "POKEDEX_CACHE_ERRORS")]
    cache_errors: bool,

    /// HTTP request timeout in seconds
    #[arg(long, env = "POKEDEX_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with REPL output
    let filter = if cli.verbose {
        "pokedex=debug,warn"
    } else {
        "pokedex=warn,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut cache_config = CacheConfig::new(Duration::from_secs(cli.cache_ttl));
    if let Some(sweep) = cli.cache_sweep {
        cache_config = cache_config.with_sweep_interval(Duration::from_secs(sweep));
    }
    let cache = Arc::new(
        ExpiringCache::with_config(cache_config).context("Failed to start response cache")?,
    );

    let client_config = ClientConfig::new(&cli.api_url)
        .with_timeout(cli.timeout)
        .cache_error_responses(cli.cache_errors);
    let client = PokeApiClient::with_config(client_config, cache.clone())
        .context("Failed to create PokeAPI client")?;

    info!(api_url = %cli.api_url, ttl = cli.cache_ttl, "Starting Pokedex");

    let mut repl = Repl::new(client, Arc::clone(&cache), StdRng::from_entropy());
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let result = repl.run(stdin, &mut stdout).await;

    cache.shutdown().await;
    result
}
