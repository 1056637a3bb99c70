//! In-memory cache for upstream forecasts.
//!
//! One entry per [`LocationKey`], holding the last payload met.no sent plus
//! its freshness metadata.
//!
//! ## Freshness
//! - Before `hard_expiry` an entry is served without touching the upstream.
//! - After it, the upstream is asked again with `If-Modified-Since` set to
//!   the entry's `Last-Modified` token. A `304` serves the cached payload
//!   as-is; expiry and token are left untouched, so the next request
//!   revalidates again.
//! - A `200` replaces the entry wholesale. Failures leave it untouched.
//!
//! ## Eviction
//! Entries not written for `write_expiry` are dropped, as are the least
//! recently used ones beyond `max_entries`. Reads never extend an entry's
//! life.
//!
//! ## Concurrency
//! Concurrent misses or revalidations for one key share a single upstream
//! call: the first caller parks a shared future in `in_flight` and later
//! callers await the same future, receiving the same payload or error.
//! Different keys never wait on each other.

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use moka::future::Cache;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use forecast_common::{ForecastError, LocationKey};
use forecast_protocol::WeatherData;

use crate::config::CacheConfig;
use crate::met_client::{ForecastSource, UpstreamResponse};

type FetchOutcome = Result<Arc<WeatherData>, ForecastError>;
type InFlightFetch = Shared<BoxFuture<'static, FetchOutcome>>;

/// Cached upstream payload plus its freshness metadata. Never mutated;
/// a refresh swaps in a new entry.
#[derive(Debug)]
pub struct CachedForecast {
    pub payload: Arc<WeatherData>,
    /// Serve without revalidating until this instant.
    pub hard_expiry: DateTime<Utc>,
    /// Upstream `Last-Modified`, sent back as `If-Modified-Since`.
    pub revalidation_token: Option<String>,
}

impl CachedForecast {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.hard_expiry
    }
}

/// Statistics for the forecast cache.
#[derive(Default)]
pub struct ForecastCacheStats {
    /// Requests served from a fresh entry.
    pub hits: AtomicU64,
    /// Fetches started with no entry present.
    pub misses: AtomicU64,
    /// Fetches started to revalidate an expired entry.
    pub stale: AtomicU64,
    /// Upstream `304` responses.
    pub not_modified: AtomicU64,
    /// Upstream calls made.
    pub upstream_fetches: AtomicU64,
    /// Callers that joined an already running fetch.
    pub coalesced: AtomicU64,
    /// Fetches that ended in an error.
    pub upstream_failures: AtomicU64,
}

impl ForecastCacheStats {
    /// Calculate cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed) + self.stale.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }

    pub fn snapshot(&self, entries: u64) -> ForecastCacheStatsSnapshot {
        ForecastCacheStatsSnapshot {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            not_modified: self.not_modified.load(Ordering::Relaxed),
            upstream_fetches: self.upstream_fetches.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            hit_rate: self.hit_rate(),
        }
    }
}

/// Point-in-time copy of [`ForecastCacheStats`].
#[derive(Debug, Clone, Serialize)]
pub struct ForecastCacheStatsSnapshot {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
    pub stale: u64,
    pub not_modified: u64,
    pub upstream_fetches: u64,
    pub coalesced: u64,
    pub upstream_failures: u64,
    pub hit_rate: f64,
}

/// Cache-aside layer in front of a [`ForecastSource`].
#[derive(Clone)]
pub struct ForecastCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    entries: Cache<LocationKey, Arc<CachedForecast>>,
    in_flight: DashMap<LocationKey, InFlightFetch>,
    source: Arc<dyn ForecastSource>,
    default_ttl: Duration,
    stats: ForecastCacheStats,
}

impl ForecastCache {
    /// Create a new forecast cache backed by `source`.
    pub fn new(source: Arc<dyn ForecastSource>, config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.write_expiry())
            .build();

        // Out-of-range TTLs are capped at a year
        let default_ttl =
            Duration::from_std(config.default_ttl()).unwrap_or_else(|_| Duration::days(365));

        info!(
            "ForecastCache initialized: default_ttl_secs={}, write_expiry_secs={}, max_entries={}",
            config.default_ttl_secs,
            config.write_expiry_secs,
            config.max_entries
        );

        Self {
            inner: Arc::new(CacheInner {
                entries,
                in_flight: DashMap::new(),
                source,
                default_ttl,
                stats: ForecastCacheStats::default(),
            }),
        }
    }

    /// Get the forecast for `key`, going upstream only when needed.
    pub async fn get(&self, key: &LocationKey) -> FetchOutcome {
        if let Some(entry) = self.inner.entries.get(key).await {
            if entry.is_fresh(Utc::now()) {
                self.inner.record_hit(key);
                return Ok(Arc::clone(&entry.payload));
            }
        }

        let fetch = match self.inner.in_flight.entry(key.clone()) {
            Entry::Occupied(slot) => {
                self.inner.stats.coalesced.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("forecast_cache_coalesced_total").increment(1);
                debug!(location = %key, "Joining in-flight forecast fetch");
                slot.get().clone()
            }
            Entry::Vacant(slot) => {
                let fetch = Arc::clone(&self.inner)
                    .refresh(key.clone())
                    .boxed()
                    .shared();
                slot.insert(fetch.clone());
                fetch
            }
        };

        fetch.await
    }

    /// Look at the current entry without going upstream.
    pub async fn peek(&self, key: &LocationKey) -> Option<Arc<CachedForecast>> {
        self.inner.entries.get(key).await
    }

    /// Number of cached locations.
    pub async fn entry_count(&self) -> u64 {
        self.inner.entries.run_pending_tasks().await;
        self.inner.entries.entry_count()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> &ForecastCacheStats {
        &self.inner.stats
    }
}

impl CacheInner {
    /// Body of an in-flight fetch. Leaves `in_flight` before resolving, so
    /// the next caller either sees the new entry or starts a new fetch.
    async fn refresh(self: Arc<Self>, key: LocationKey) -> FetchOutcome {
        let result = self.revalidate_or_fetch(&key).await;
        self.in_flight.remove(&key);
        if result.is_err() {
            self.stats.upstream_failures.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    async fn revalidate_or_fetch(&self, key: &LocationKey) -> FetchOutcome {
        let current = self.entries.get(key).await;

        // Another fetch may have refreshed the entry since the caller looked
        match &current {
            Some(entry) if entry.is_fresh(Utc::now()) => {
                self.record_hit(key);
                return Ok(Arc::clone(&entry.payload));
            }
            Some(_) => {
                self.stats.stale.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("forecast_cache_requests_total", "outcome" => "stale")
                    .increment(1);
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("forecast_cache_requests_total", "outcome" => "miss")
                    .increment(1);
            }
        }

        let token = current
            .as_ref()
            .and_then(|entry| entry.revalidation_token.as_deref());

        self.stats.upstream_fetches.fetch_add(1, Ordering::Relaxed);
        let response = match self.source.fetch(key, token).await {
            Ok(response) => response,
            Err(e) => {
                metrics::counter!("forecast_upstream_requests_total", "status" => "error")
                    .increment(1);
                warn!(location = %key, error = %e, "Forecast fetch failed, cache left untouched");
                return Err(e);
            }
        };

        match response {
            UpstreamResponse::NotModified => {
                self.stats.not_modified.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("forecast_upstream_requests_total", "status" => "not_modified")
                    .increment(1);
                match current {
                    Some(entry) => {
                        info!(location = %key, "Not modified returned by upstream, serving cached forecast");
                        Ok(Arc::clone(&entry.payload))
                    }
                    None => Err(ForecastError::UpstreamUnavailable(
                        "upstream reported not modified but no forecast is cached".to_string(),
                    )),
                }
            }
            UpstreamResponse::Modified {
                payload,
                expires,
                last_modified,
            } => {
                metrics::counter!("forecast_upstream_requests_total", "status" => "ok")
                    .increment(1);

                let hard_expiry = expires.unwrap_or_else(|| {
                    Utc::now()
                        .checked_add_signed(self.default_ttl)
                        .unwrap_or(DateTime::<Utc>::MAX_UTC)
                });
                let entry = Arc::new(CachedForecast {
                    payload: Arc::new(payload),
                    hard_expiry,
                    revalidation_token: last_modified,
                });
                self.entries.insert(key.clone(), Arc::clone(&entry)).await;

                info!(location = %key, hard_expiry = %hard_expiry, "Updated forecast cache entry");
                Ok(Arc::clone(&entry.payload))
            }
        }
    }

    fn record_hit(&self, key: &LocationKey) {
        self.stats.hits.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("forecast_cache_requests_total", "outcome" => "hit").increment(1);
        debug!(location = %key, "Returning forecast from cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_entry_freshness_boundary() {
        let expiry: DateTime<Utc> = "2024-11-29T13:34:26Z".parse().unwrap();
        let entry = CachedForecast {
            payload: Arc::new(WeatherData::default()),
            hard_expiry: expiry,
            revalidation_token: None,
        };

        assert!(entry.is_fresh(expiry - Duration::seconds(1)));
        assert!(!entry.is_fresh(expiry));
        assert!(!entry.is_fresh(expiry + Duration::seconds(1)));
    }

    #[test]
    fn test_hit_rate() {
        let stats = ForecastCacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);

        stats.hits.store(3, Ordering::Relaxed);
        stats.misses.store(1, Ordering::Relaxed);
        assert_approx_eq!(stats.hit_rate(), 75.0, 1e-9);

        stats.stale.store(2, Ordering::Relaxed);
        assert_approx_eq!(stats.hit_rate(), 50.0, 1e-9);
    }

    #[test]
    fn test_snapshot_serialization() {
        let stats = ForecastCacheStats::default();
        stats.upstream_fetches.store(2, Ordering::Relaxed);

        let json = serde_json::to_value(stats.snapshot(1)).unwrap();
        assert_eq!(json["entries"], 1);
        assert_eq!(json["upstream_fetches"], 2);
        assert_eq!(json["coalesced"], 0);
    }
}
