//! # scenecard-runtime
//!
//! Async fan-out for scene-card construction.
//!
//! `scenecard-core` is fully deterministic and never touches the network;
//! this crate supplies everything around it: the provider-adapter traits,
//! built-in deterministic providers (solar position, latitude-belt
//! climate), feature-gated HTTP providers, the orchestrator that fans out
//! to all four adapters concurrently, and an optional provider cache.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scenecard_runtime::{SceneOrchestrator, providers::NominatimGeocoder};
//! use scenecard_core::SceneRequest;
//!
//! let orchestrator = SceneOrchestrator::builder()
//!     .geocoder(Arc::new(NominatimGeocoder::new()?))
//!     .build();
//!
//! let request = SceneRequest::new(48.85837, 2.29448, datetime_local, "Europe/Paris");
//! let card = orchestrator.construct(&request).await?;
//! ```
//!
//! Adapters that were never wired up degrade their section instead of
//! failing the request; callers read the card's confidence scores to tell
//! a full card from a degraded one.

pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod providers;

// Re-export main types at crate root
pub use cache::{CacheKey, CachedGeocoder, CachedMapContext, CachedWeather};
pub use config::{AdapterKind, RuntimeConfig};
pub use orchestrator::{SceneOrchestrator, SceneOrchestratorBuilder};
pub use providers::{
    ClimateLookup, Disabled, Geocoder, LatitudeBeltClimate, MapContextSource,
    NoaaSolarCalculator, ProviderInitError, SolarCalculator, WeatherSource,
};
