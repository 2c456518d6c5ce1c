//! Result cache for weather queries.
//!
//! Keyed by the normalized query (location, state code, sorted dates).
//! Only successful results are stored. Entries expire passively once
//! their TTL has elapsed; nothing refreshes them in the background.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::result::{CacheStats, WeatherResult};

/// Longest TTL the cache accepts; longer settings are capped to it.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// When false, every query is resolved from the network.
    pub enabled: bool,

    /// How long a stored result is served.
    pub ttl: Duration,

    /// Maximum number of cached results.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 1000,
        }
    }
}

/// A stored result and when it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: WeatherResult,
    pub stored_at: DateTime<Utc>,
}

/// Cache of successful weather results.
pub struct WeatherCache {
    /// `None` when caching is disabled.
    entries: Option<MokaCache<String, CacheEntry>>,
    ttl: Duration,
    max_capacity: u64,
}

impl WeatherCache {
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = config.ttl.min(MAX_TTL);
        if ttl < config.ttl {
            warn!(requested = ?config.ttl, capped = ?ttl, "cache TTL capped");
        }
        let entries = config.enabled.then(|| {
            MokaCache::builder()
                .time_to_live(ttl)
                .max_capacity(config.max_capacity)
                .build()
        });

        Self {
            entries,
            ttl,
            max_capacity: config.max_capacity,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Return the cached result for `key`, or run `resolve` and cache its
    /// result if it succeeded.
    ///
    /// Concurrent calls for the same key share one `resolve`. A result
    /// served from an earlier resolution is marked `cached` with the time
    /// it was stored.
    pub async fn get_or_resolve<Fut>(&self, key: &str, resolve: Fut) -> WeatherResult
    where
        Fut: Future<Output = WeatherResult>,
    {
        let Some(entries) = &self.entries else {
            return resolve.await;
        };

        let resolved_here = AtomicBool::new(false);
        let outcome = entries
            .try_get_with(key.to_string(), async {
                resolved_here.store(true, Ordering::Relaxed);
                let result = resolve.await;
                if result.success {
                    Ok(CacheEntry {
                        result,
                        stored_at: Utc::now(),
                    })
                } else {
                    Err(result)
                }
            })
            .await;

        match outcome {
            Ok(entry) if resolved_here.load(Ordering::Relaxed) => entry.result,
            Ok(entry) => {
                debug!(key, stored_at = %entry.stored_at, "cache hit");
                entry.result.into_cached(entry.stored_at)
            }
            Err(failed) => WeatherResult::clone(&failed),
        }
    }

    /// Count entries, splitting them by whether their TTL has elapsed.
    pub async fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            enabled: self.is_enabled(),
            ttl_hours: self.ttl.as_secs_f64() / 3600.0,
            max_entries: self.max_capacity,
            total_entries: 0,
            valid_entries: 0,
            expired_entries: 0,
        };
        let Some(entries) = &self.entries else {
            return stats;
        };

        entries.run_pending_tasks().await;
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        for (_, entry) in entries.iter() {
            stats.total_entries += 1;
            if now - entry.stored_at < ttl {
                stats.valid_entries += 1;
            }
        }
        stats.expired_entries = stats.total_entries - stats.valid_entries;
        stats
    }

    /// Drop every entry, returning how many there were.
    pub async fn clear(&self) -> u64 {
        let Some(entries) = &self.entries else {
            return 0;
        };
        entries.run_pending_tasks().await;
        let count = entries.iter().count() as u64;
        entries.invalidate_all();
        entries.run_pending_tasks().await;
        count
    }
}
