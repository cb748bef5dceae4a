//! Scene-card construction orchestrator.
//!
//! Drives the whole pipeline:
//! - Fail-fast input validation before any adapter runs
//! - Parallel fan-out to the four adapters via `tokio::join!`
//! - Per-adapter timeout and bounded retry; a settled failure degrades
//!   that section and never aborts the pipeline
//! - Deterministic fan-in through [`scenecard_core::assemble`]
//!
//! Cancellation is structural: dropping the `construct` future drops the
//! in-flight adapter futures with it, and no partial card escapes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use chrono::{Datelike, Utc};

use scenecard_core::{
    assemble, ConstructionError, PromptStyle, SceneCard, SceneRequest, SectionOutcome,
    SectionOutcomes, Unavailable,
};

use crate::config::{AdapterKind, RuntimeConfig};
use crate::providers::{
    ClimateLookup, Disabled, Geocoder, LatitudeBeltClimate, MapContextSource,
    NoaaSolarCalculator, SolarCalculator, WeatherSource,
};

/// The orchestrator owns one adapter per family plus the prompt style and
/// runtime settings. It holds no per-request state: concurrent `construct`
/// calls share it freely behind an `Arc`.
pub struct SceneOrchestrator {
    geocoder: Arc<dyn Geocoder>,
    map_context: Arc<dyn MapContextSource>,
    solar: Arc<dyn SolarCalculator>,
    weather: Arc<dyn WeatherSource>,
    climate: Arc<dyn ClimateLookup>,
    style: PromptStyle,
    config: RuntimeConfig,
}

impl SceneOrchestrator {
    /// Start building an orchestrator.
    pub fn builder() -> SceneOrchestratorBuilder {
        SceneOrchestratorBuilder::new()
    }

    /// Construct one scene card.
    ///
    /// # Execution Flow
    /// 1. Validate raw inputs (fatal on violation, nothing is dispatched)
    /// 2. Fan-out: all four adapters run concurrently, each with its own
    ///    timeout and bounded retry
    /// 3. Fan-in: deterministic assembly, classification, confidence,
    ///    prompt, and schema validation
    pub async fn construct(&self, request: &SceneRequest) -> Result<SceneCard, ConstructionError> {
        request.validate().map_err(ConstructionError::Input)?;

        let radius = request.effective_radius_m();
        let date = request.local_date();

        let (geocode, map, sun, weather) = tokio::join!(
            self.settle(AdapterKind::Geocoder, self.geocoder.name(), || {
                self.geocoder.reverse(request.lat, request.lon)
            }),
            self.settle(AdapterKind::MapContext, self.map_context.name(), || {
                self.map_context.features(request.lat, request.lon, radius)
            }),
            self.settle(AdapterKind::Sun, self.solar.name(), || {
                self.solar
                    .position(request.lat, request.lon, request.datetime_local)
            }),
            self.settle(AdapterKind::Weather, self.weather.name(), || {
                self.weather.daily(request.lat, request.lon, date)
            }),
        );

        let climate = self
            .climate
            .lookup(request.lat, request.lon, request.datetime_local.ordinal())
            .map(|facts| SectionOutcome::ok(facts, self.climate.name()));

        let outcomes = SectionOutcomes {
            geocode,
            map,
            sun,
            weather,
            climate,
        };

        assemble(request, outcomes, &self.style, Utc::now())
    }

    /// Run one adapter call to a settled outcome: timeout each attempt,
    /// retry within the configured bound, then accept unavailability.
    async fn settle<T, F, Fut>(&self, kind: AdapterKind, name: &str, call: F) -> SectionOutcome<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, Unavailable>>,
    {
        let timeout = self.config.timeout_for(kind);

        let attempt = || async {
            match tokio::time::timeout(timeout, call()).await {
                Ok(result) => result,
                Err(_) => Err(Unavailable::Timeout(timeout)),
            }
        };

        let result = attempt
            .retry(
                ConstantBuilder::default()
                    .with_delay(self.config.retry_delay)
                    .with_max_times(self.config.max_retries),
            )
            // a provider that was never wired up cannot start working
            .when(|err: &Unavailable| !matches!(err, Unavailable::NotConfigured))
            .notify(|err: &Unavailable, _sleep: Duration| {
                tracing::debug!(
                    adapter = kind.as_str(),
                    reason = err.reason_code(),
                    "adapter attempt failed, retrying"
                );
            })
            .await;

        match result {
            Ok(facts) => SectionOutcome::ok(facts, name),
            Err(reason) => {
                tracing::warn!(
                    adapter = kind.as_str(),
                    reason = reason.reason_code(),
                    "adapter unavailable, section degrades"
                );
                SectionOutcome::unavailable(reason)
            }
        }
    }
}

/// Builder for [`SceneOrchestrator`].
///
/// Unset fallible adapters default to [`Disabled`], so a partially wired
/// orchestrator still constructs valid (degraded) cards; the sun and
/// climate slots default to the built-in deterministic providers.
pub struct SceneOrchestratorBuilder {
    geocoder: Option<Arc<dyn Geocoder>>,
    map_context: Option<Arc<dyn MapContextSource>>,
    solar: Option<Arc<dyn SolarCalculator>>,
    weather: Option<Arc<dyn WeatherSource>>,
    climate: Option<Arc<dyn ClimateLookup>>,
    style: PromptStyle,
    config: RuntimeConfig,
}

impl SceneOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            geocoder: None,
            map_context: None,
            solar: None,
            weather: None,
            climate: None,
            style: PromptStyle::default(),
            config: RuntimeConfig::default(),
        }
    }

    pub fn geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn map_context(mut self, map_context: Arc<dyn MapContextSource>) -> Self {
        self.map_context = Some(map_context);
        self
    }

    pub fn solar(mut self, solar: Arc<dyn SolarCalculator>) -> Self {
        self.solar = Some(solar);
        self
    }

    pub fn weather(mut self, weather: Arc<dyn WeatherSource>) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn climate(mut self, climate: Arc<dyn ClimateLookup>) -> Self {
        self.climate = Some(climate);
        self
    }

    pub fn style(mut self, style: PromptStyle) -> Self {
        self.style = style;
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> SceneOrchestrator {
        SceneOrchestrator {
            geocoder: self.geocoder.unwrap_or_else(|| Arc::new(Disabled)),
            map_context: self.map_context.unwrap_or_else(|| Arc::new(Disabled)),
            solar: self
                .solar
                .unwrap_or_else(|| Arc::new(NoaaSolarCalculator::new())),
            weather: self.weather.unwrap_or_else(|| Arc::new(Disabled)),
            climate: self
                .climate
                .unwrap_or_else(|| Arc::new(LatitudeBeltClimate::new())),
            style: self.style,
            config: self.config,
        }
    }
}

impl Default for SceneOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
