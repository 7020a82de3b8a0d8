//! In-memory response cache with background expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{trace, warn};

use pokedex_core::error::{PokedexError, Result};
use pokedex_core::traits::ResponseCache;

type Entries = Arc<Mutex<HashMap<String, CacheEntry>>>;

struct CacheEntry {
    value: Vec<u8>,
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

/// Cache configuration.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// How long an entry lives before the sweep may remove it
    pub ttl: Duration,
    /// Period of the background sweep (defaults to `ttl`)
    pub sweep_interval: Option<Duration>,
}

impl CacheConfig {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sweep_interval: None,
        }
    }

    /// Sweeps on a different period than the TTL.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    fn effective_sweep_interval(&self) -> Duration {
        self.sweep_interval.unwrap_or(self.ttl)
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Entries past their TTL that the sweep has not removed yet
    pub expired_entries: usize,
    /// Configured TTL
    pub ttl: Duration,
}

/// Expiring byte cache keyed by request URL.
///
/// Every read and write goes through one mutex shared with the sweep task.
/// `get` never checks freshness: a stale entry stays visible until the next
/// sweep. The task stops on [`ExpiringCache::shutdown`] or on drop.
pub struct ExpiringCache {
    entries: Entries,
    ttl: Duration,
    shutdown_tx: watch::Sender<bool>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl ExpiringCache {
    /// Creates a cache whose entries live for `ttl`, sweeping once per `ttl`.
    pub fn new(ttl: Duration) -> Result<Self> {
        Self::with_config(CacheConfig::new(ttl))
    }

    /// Creates a cache and spawns its sweep task on the current tokio runtime.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        if config.ttl.is_zero() {
            return Err(PokedexError::InvalidTtl(config.ttl));
        }
        let period = config.effective_sweep_interval();
        if period.is_zero() {
            return Err(PokedexError::ConfigError(
                "cache sweep interval must be greater than zero".into(),
            ));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PokedexError::SweepStartFailed(e.to_string()))?;

        let entries: Entries = Arc::default();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = runtime.spawn(sweep_loop(
            Arc::clone(&entries),
            config.ttl,
            period,
            shutdown_rx,
        ));

        Ok(Self {
            entries,
            ttl: config.ttl,
            shutdown_tx,
            sweeper: Mutex::new(Some(sweeper)),
        })
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let (key, value) = (key.into(), value.into());
        // Timestamp taken under the lock so replacements never go back in time
        let mut entries = self.entries.lock();
        entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    /// Returns a copy of the bytes stored under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().get(key).map(|entry| entry.value.clone())
    }

    /// Runs one sweep pass now and returns how many entries were removed.
    pub fn purge_expired(&self) -> usize {
        purge(&self.entries, self.ttl)
    }

    /// Stops the sweep task and waits for it to exit. Idempotent.
    pub async fn shutdown(&self) {
        let sweeper = self.sweeper.lock().take();
        let Some(sweeper) = sweeper else {
            return;
        };
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = sweeper.await {
            if !e.is_cancelled() {
                warn!(error = %e, "Cache sweep task panicked");
            }
        }
    }

    /// Counts stored entries and how many are waiting for the sweep.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        let now = Instant::now();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: entries
                .values()
                .filter(|entry| entry.is_expired(now, self.ttl))
                .count(),
            ttl: self.ttl,
        }
    }
}

impl ResponseCache for ExpiringCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        ExpiringCache::get(self, key)
    }

    fn put(&self, key: &str, value: Vec<u8>) {
        ExpiringCache::put(self, key, value)
    }
}

impl Drop for ExpiringCache {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.get_mut().take() {
            sweeper.abort();
        }
    }
}

fn purge(entries: &Mutex<HashMap<String, CacheEntry>>, ttl: Duration) -> usize {
    let mut entries = entries.lock();
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now, ttl));
    before - entries.len()
}

async fn sweep_loop(
    entries: Entries,
    ttl: Duration,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = purge(&entries, ttl);
                if removed > 0 {
                    trace!(removed, "Swept expired cache entries");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}
