//! Deterministic fan-in: settled adapter outcomes → validated scene card.
//!
//! Everything async and fallible happens upstream in the runtime crate.
//! By the time this module runs, every adapter has settled into a
//! [`SectionOutcome`] and assembly is a pure function: same request, same
//! outcomes, same style, same `created_at` → the same card, byte for byte.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::card::{
    validate::{validate_card, ValidationError},
    Climate, Location, MapContext, MapElements, Provenance, SceneCard, SourceFacts, SunGeometry,
    Weather, CanonicalCondition, CARD_VERSION,
};
use crate::classify;
use crate::confidence::{
    location_score, map_context_score, sun_score, weather_score, Confidence,
};
use crate::facts::{
    ClimateFacts, GeocodeFacts, MapFacts, SectionOutcome, SunFacts, Unavailable, WeatherFacts,
};
use crate::ident::scene_id;
use crate::input::{InputError, SceneRequest};
use crate::prompt::{distill, PromptStyle};

/// Hard cap on POI labels carried into a card.
pub const MAX_POIS: usize = 5;

/// Hard cap on a single POI label, in characters.
pub const MAX_POI_CHARS: usize = 48;

/// Construction failure. Either the inputs were bad (no work was done) or
/// the assembled card failed validation (an assembly bug; degraded data
/// alone can never produce this).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("assembled card failed validation: {0}")]
    Validation(#[from] ValidationError),
}

/// The settled results of the adapter fan-out, one slot per section.
#[derive(Debug, Clone)]
pub struct SectionOutcomes {
    pub geocode: SectionOutcome<GeocodeFacts>,
    pub map: SectionOutcome<MapFacts>,
    pub sun: SectionOutcome<SunFacts>,
    pub weather: SectionOutcome<WeatherFacts>,
    /// Climate lookup result; infallible providers just return facts.
    pub climate: Option<SectionOutcome<ClimateFacts>>,
}

impl SectionOutcomes {
    /// Every adapter unavailable for the same reason. The degenerate case:
    /// assembly must still produce a valid card from this.
    pub fn all_unavailable(reason: Unavailable) -> Self {
        Self {
            geocode: SectionOutcome::unavailable(reason.clone()),
            map: SectionOutcome::unavailable(reason.clone()),
            sun: SectionOutcome::unavailable(reason.clone()),
            weather: SectionOutcome::unavailable(reason),
            climate: None,
        }
    }
}

/// Assemble and validate a scene card from settled outcomes.
///
/// `created_at` is passed in rather than read from the clock so that the
/// whole fan-in is deterministic; the orchestrator supplies `Utc::now()`.
pub fn assemble(
    request: &SceneRequest,
    outcomes: SectionOutcomes,
    style: &PromptStyle,
    created_at: DateTime<Utc>,
) -> Result<SceneCard, ConstructionError> {
    request.validate()?;

    let degraded = [
        ("location", outcomes.geocode.outcome.as_ref().err()),
        ("map_context", outcomes.map.outcome.as_ref().err()),
        ("sun", outcomes.sun.outcome.as_ref().err()),
        ("weather", outcomes.weather.outcome.as_ref().err()),
    ];
    for (section, reason) in degraded {
        if let Some(reason) = reason {
            tracing::debug!(
                section,
                reason = reason.reason_code(),
                "assembling degraded section"
            );
        }
    }

    let source = SourceFacts {
        lat: request.lat,
        lon: request.lon,
        heading_deg: request.heading_deg,
        datetime_local: request.datetime_local,
        timezone: request.timezone.clone(),
    };

    let location = build_location(&outcomes.geocode, request);
    let map_context = build_map_context(&outcomes.map);
    let sun = build_sun(&outcomes.sun);
    let weather = build_weather(&outcomes.weather);
    let climate = build_climate(outcomes.climate.as_ref());

    let confidence = Confidence {
        location: location_score(&outcomes.geocode.outcome),
        map_context: map_context_score(&outcomes.map.outcome, map_context.elements.road_type),
        sun: sun_score(&outcomes.sun.outcome),
        weather: weather_score(&outcomes.weather.outcome, request.local_date()),
    };

    let prompt = distill(&source, &map_context, &weather, &sun, style);

    let card = SceneCard {
        version: CARD_VERSION.to_string(),
        id: scene_id(created_at, request.lat, request.lon),
        source,
        location,
        map_context,
        sun,
        weather,
        climate,
        prompt,
        notes: None,
        provenance: Provenance {
            geocoder: outcomes.geocode.source,
            map_context: outcomes.map.source,
            sun: outcomes.sun.source,
            weather: outcomes.weather.source,
            climate: outcomes.climate.and_then(|c| c.source),
            created_at_utc: created_at,
        },
        confidence,
    };

    validate_card(&card)?;
    Ok(card)
}

fn build_location(outcome: &SectionOutcome<GeocodeFacts>, request: &SceneRequest) -> Location {
    match outcome.available() {
        None => Location::coordinate_fallback(request.lat, request.lon),
        Some(facts) => {
            let display_name = facts
                .display_name
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| format!("{:.5}, {:.5}", request.lat, request.lon));
            Location {
                display_name,
                road: facts.road.clone(),
                suburb: facts.suburb.clone(),
                city: facts.city.clone(),
                state: facts.state.clone(),
                postcode: facts.postcode.clone(),
                country: facts.country.clone(),
                country_code: facts.country_code.clone(),
            }
        }
    }
}

fn build_map_context(outcome: &SectionOutcome<MapFacts>) -> MapContext {
    let Some(facts) = outcome.available() else {
        return MapContext::default();
    };

    let counts = classify::LanduseCounts::from_raw(
        &facts.landuse,
        &facts.natural,
        &facts.highway,
        facts.building_count.unwrap_or(0),
    );

    let road_type = classify::dominant_road_type(facts.highway.keys().map(String::as_str));

    let pois = facts
        .pois
        .iter()
        .take(MAX_POIS)
        .map(|label| truncate_label(label))
        .collect();

    MapContext {
        landuse: facts.landuse.keys().cloned().collect(),
        place_type: Some(classify::place_type(&counts)),
        elements: MapElements {
            road_type,
            sidewalk: facts.sidewalk,
            water: facts.water || counts.water > 0,
            park: facts.park || counts.park > 0,
            building_height_hint: classify::building_height(facts.avg_building_levels),
            building_density: classify::building_density(facts.building_count),
            pois,
        },
    }
}

fn truncate_label(label: &str) -> String {
    label.trim().chars().take(MAX_POI_CHARS).collect()
}

fn build_sun(outcome: &SectionOutcome<SunFacts>) -> SunGeometry {
    match outcome.available() {
        Some(facts) => SunGeometry::from_position(facts.azimuth_deg, facts.elevation_deg),
        None => SunGeometry::unavailable(),
    }
}

fn build_weather(outcome: &SectionOutcome<WeatherFacts>) -> Weather {
    let Some(facts) = outcome.available() else {
        return Weather::default();
    };

    let condition = facts
        .condition
        .or_else(|| facts.label.as_deref().map(classify::canonical_condition))
        .unwrap_or(CanonicalCondition::Unknown);

    Weather {
        condition,
        temperature_c: facts.temperature_c,
        precip_mm: facts.precip_mm,
        wind_mps: facts.wind_mps,
        visibility_km: facts.visibility_km,
        wet_ground: classify::wet_ground(condition, facts.precip_mm),
    }
}

fn build_climate(outcome: Option<&SectionOutcome<ClimateFacts>>) -> Climate {
    match outcome.and_then(SectionOutcome::available) {
        Some(facts) => Climate {
            koppen: facts.koppen.clone(),
            leaf_on: facts.leaf_on,
        },
        None => Climate::default(),
    }
}
