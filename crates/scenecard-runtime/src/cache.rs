//! Optional provider-level caching.
//!
//! Sits entirely outside the construction pipeline: callers who want to
//! spare a rate-limited provider wrap it in the matching `Cached*` adapter
//! and hand that to the orchestrator builder. Keys are rounded coordinates
//! plus the request date plus the adapter identity, and
//! `moka::future::Cache::try_get_with` guarantees at-most-one-fetch-per-key
//! under concurrent lookups. Failures are never cached; the next request
//! retries the provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use moka::future::Cache;

use scenecard_core::{GeocodeFacts, MapFacts, Unavailable, WeatherFacts};

use crate::providers::{Geocoder, MapContextSource, WeatherSource};

/// Cache key: rounded coordinates + optional date + adapter identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Latitude in 1e-5 degree ticks (the id rounding bucket, ~1.1 m).
    lat_e5: i64,
    /// Longitude in 1e-5 degree ticks.
    lon_e5: i64,
    /// Request date for dated lookups; `None` for point-only lookups.
    date: Option<NaiveDate>,
    adapter: String,
}

impl CacheKey {
    pub fn new(adapter: &str, lat: f64, lon: f64, date: Option<NaiveDate>) -> Self {
        Self {
            lat_e5: (lat * 1e5).round() as i64,
            lon_e5: (lon * 1e5).round() as i64,
            date,
            adapter: adapter.to_string(),
        }
    }
}

fn build_cache<T: Clone + Send + Sync + 'static>(
    max_entries: u64,
    ttl: Duration,
) -> Cache<CacheKey, T> {
    Cache::builder()
        .max_capacity(max_entries)
        .time_to_live(ttl)
        .build()
}

const DEFAULT_MAX_ENTRIES: u64 = 10_000;
const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Caching wrapper for a [`Geocoder`].
pub struct CachedGeocoder<G> {
    inner: G,
    cache: Cache<CacheKey, GeocodeFacts>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self::with_capacity(inner, DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }

    pub fn with_capacity(inner: G, max_entries: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: build_cache(max_entries, ttl),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<GeocodeFacts, Unavailable> {
        let key = CacheKey::new(self.inner.name(), lat, lon, None);
        self.cache
            .try_get_with(key, self.inner.reverse(lat, lon))
            .await
            .map_err(|e: Arc<Unavailable>| (*e).clone())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Caching wrapper for a [`MapContextSource`].
///
/// The radius is deliberately absent from the key: one deployment queries
/// one radius, and mixing radii under one cache would serve the wrong
/// summary.
pub struct CachedMapContext<M> {
    inner: M,
    cache: Cache<CacheKey, MapFacts>,
}

impl<M: MapContextSource> CachedMapContext<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            cache: build_cache(DEFAULT_MAX_ENTRIES, DEFAULT_TTL),
        }
    }
}

#[async_trait]
impl<M: MapContextSource> MapContextSource for CachedMapContext<M> {
    async fn features(
        &self,
        lat: f64,
        lon: f64,
        radius_m: u32,
    ) -> Result<MapFacts, Unavailable> {
        let key = CacheKey::new(self.inner.name(), lat, lon, None);
        self.cache
            .try_get_with(key, self.inner.features(lat, lon, radius_m))
            .await
            .map_err(|e: Arc<Unavailable>| (*e).clone())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Caching wrapper for a [`WeatherSource`]; keyed by date as well.
pub struct CachedWeather<W> {
    inner: W,
    cache: Cache<CacheKey, WeatherFacts>,
}

impl<W: WeatherSource> CachedWeather<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            cache: build_cache(DEFAULT_MAX_ENTRIES, DEFAULT_TTL),
        }
    }
}

#[async_trait]
impl<W: WeatherSource> WeatherSource for CachedWeather<W> {
    async fn daily(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<WeatherFacts, Unavailable> {
        let key = CacheKey::new(self.inner.name(), lat, lon, Some(date));
        self.cache
            .try_get_with(key, self.inner.daily(lat, lon, date))
            .await
            .map_err(|e: Arc<Unavailable>| (*e).clone())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
