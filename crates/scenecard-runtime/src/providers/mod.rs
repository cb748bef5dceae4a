//! Provider adapter abstractions.
//!
//! One trait per external data source family. Every fallible adapter
//! settles into `Result<Facts, Unavailable>`: no panic crosses the
//! boundary, no adapter retries on its own (bounded retry belongs to the
//! orchestrator), and no state is shared. New providers implement the
//! matching trait; nothing subclasses anything.
//!
//! ## Isolation Contract
//!
//! Each adapter invocation operates in isolation:
//! - No access to other adapters' results
//! - No shared mutable state between concurrent invocations
//! - Deterministic fact ordering via `BTreeMap` (not `HashMap`)

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use thiserror::Error;

use scenecard_core::{ClimateFacts, GeocodeFacts, MapFacts, SunFacts, Unavailable, WeatherFacts};

/// Errors constructing a provider, before any query runs.
#[derive(Error, Debug)]
pub enum ProviderInitError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

mod climate;
mod solar;

#[cfg(feature = "nominatim")]
mod nominatim;

#[cfg(feature = "open-meteo")]
mod open_meteo;

#[cfg(feature = "overpass")]
mod overpass;

pub use climate::LatitudeBeltClimate;
pub use solar::NoaaSolarCalculator;

#[cfg(feature = "nominatim")]
pub use nominatim::NominatimGeocoder;

#[cfg(feature = "open-meteo")]
pub use open_meteo::OpenMeteoWeather;

#[cfg(feature = "overpass")]
pub use overpass::OverpassMapContext;

/// Reverse geocoding: point → administrative labels.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve labels for a point, or report unavailability.
    async fn reverse(&self, lat: f64, lon: f64) -> Result<GeocodeFacts, Unavailable>;

    /// Adapter identity for provenance, e.g. `"nominatim/0.1"`.
    fn name(&self) -> &str;
}

/// Map-feature summary: point + radius → raw tag summary.
#[async_trait]
pub trait MapContextSource: Send + Sync {
    /// Summarize features within `radius_m` of the point. Implementations
    /// must cap POI label count and length before returning.
    async fn features(&self, lat: f64, lon: f64, radius_m: u32)
        -> Result<MapFacts, Unavailable>;

    fn name(&self) -> &str;
}

/// Solar position: point + instant → azimuth/elevation.
///
/// This is a deterministic calculation rather than a network call, but it
/// rides the same contract so the orchestrator can fan out uniformly.
#[async_trait]
pub trait SolarCalculator: Send + Sync {
    async fn position(
        &self,
        lat: f64,
        lon: f64,
        at: DateTime<FixedOffset>,
    ) -> Result<SunFacts, Unavailable>;

    fn name(&self) -> &str;
}

/// Weather: point + local date → observation bundle.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn daily(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<WeatherFacts, Unavailable>;

    fn name(&self) -> &str;
}

/// Climate-zone lookup: point + day of year → Köppen facts.
///
/// Not one of the four concurrent adapters (it carries no confidence
/// section), so it stays synchronous and optional: `None` simply leaves
/// the card's climate section empty.
pub trait ClimateLookup: Send + Sync {
    fn lookup(&self, lat: f64, lon: f64, day_of_year: u32) -> Option<ClimateFacts>;

    fn name(&self) -> &str;
}

/// Stand-in for an adapter the caller never wired up. Always reports
/// `NotConfigured`, which the orchestrator degrades like any other
/// unavailability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

#[async_trait]
impl Geocoder for Disabled {
    async fn reverse(&self, _lat: f64, _lon: f64) -> Result<GeocodeFacts, Unavailable> {
        Err(Unavailable::NotConfigured)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

#[async_trait]
impl MapContextSource for Disabled {
    async fn features(
        &self,
        _lat: f64,
        _lon: f64,
        _radius_m: u32,
    ) -> Result<MapFacts, Unavailable> {
        Err(Unavailable::NotConfigured)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

#[async_trait]
impl WeatherSource for Disabled {
    async fn daily(
        &self,
        _lat: f64,
        _lon: f64,
        _date: NaiveDate,
    ) -> Result<WeatherFacts, Unavailable> {
        Err(Unavailable::NotConfigured)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_adapters_report_not_configured() {
        let geo = Disabled.reverse(48.0, 2.0).await;
        assert_eq!(geo.unwrap_err(), Unavailable::NotConfigured);

        let map = MapContextSource::features(&Disabled, 48.0, 2.0, 150).await;
        assert_eq!(map.unwrap_err(), Unavailable::NotConfigured);
    }
}
