//! Raw per-section facts as adapters report them.
//!
//! These DTOs sit between the provider adapters (runtime crate) and the
//! deterministic fan-in here: an adapter settles into exactly one
//! [`SectionOutcome`], either facts or an explicit [`Unavailable`] reason.
//! Classification happens later, during assembly, so the same facts always
//! classify the same way.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::CanonicalCondition;

/// Why a provider produced no data.
///
/// The orchestrator treats every variant the same way: omit the section's
/// data, zero or reduce its confidence, keep going. The reason code lands
/// in logs, never in the card.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Unavailable {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("provider not configured")]
    NotConfigured,

    #[error("internal provider error: {0}")]
    Internal(String),
}

impl Unavailable {
    /// Stable short code for logging and metrics.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
            Self::Malformed(_) => "malformed",
            Self::NotConfigured => "not_configured",
            Self::Internal(_) => "internal",
        }
    }
}

/// One adapter's settled result plus its identity for provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOutcome<T> {
    pub outcome: Result<T, Unavailable>,
    /// Adapter name/version string, e.g. `"nominatim/0.1"`.
    pub source: Option<String>,
}

impl<T> SectionOutcome<T> {
    pub fn ok(facts: T, source: impl Into<String>) -> Self {
        Self {
            outcome: Ok(facts),
            source: Some(source.into()),
        }
    }

    pub fn unavailable(reason: Unavailable) -> Self {
        Self {
            outcome: Err(reason),
            source: None,
        }
    }

    /// The facts, if the adapter delivered any.
    pub fn available(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }
}

/// Administrative labels from the reverse geocoder, raw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeFacts {
    pub display_name: Option<String>,
    pub road: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

/// Raw map-feature summary within the query radius.
///
/// Tag value counts use `BTreeMap` so iteration (and therefore every
/// derived classification) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapFacts {
    /// `landuse=*` value → occurrence count.
    pub landuse: BTreeMap<String, u32>,
    /// `natural=*` value → occurrence count.
    pub natural: BTreeMap<String, u32>,
    /// `highway=*` value → occurrence count.
    pub highway: BTreeMap<String, u32>,
    /// Building footprints seen, if footprint data came back at all.
    pub building_count: Option<u32>,
    /// Mean `building:levels` across tagged footprints.
    pub avg_building_levels: Option<f64>,
    pub sidewalk: bool,
    pub water: bool,
    pub park: bool,
    /// Named POI labels, most-notable-first, already capped by the adapter.
    pub pois: Vec<String>,
}

/// Computed solar position, pre-normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunFacts {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

/// Raw weather observation bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherFacts {
    /// Provider's free-text condition label, canonicalized during assembly.
    pub label: Option<String>,
    /// Pre-canonicalized condition for providers that speak codes rather
    /// than labels (e.g. WMO weather codes). Takes precedence over `label`.
    pub condition: Option<CanonicalCondition>,
    pub temperature_c: Option<f64>,
    pub precip_mm: Option<f64>,
    pub wind_mps: Option<f64>,
    pub visibility_km: Option<f64>,
    /// The date the observation describes; drives the recency score.
    pub observation_date: Option<NaiveDate>,
}

/// Climate classification facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateFacts {
    pub koppen: Option<String>,
    pub leaf_on: Option<bool>,
}
