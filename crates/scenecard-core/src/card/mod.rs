//! The scene card data model.
//!
//! A [`SceneCard`] is the single artifact this workspace produces: a
//! versioned, schema-validated record of the physical and environmental
//! context around a GPS point at a local time. Field names, units, and
//! enumerations here are the wire contract; downstream consumers match on
//! them byte for byte.
//!
//! Degraded sections keep their object shape. When a provider was
//! unavailable the section is still present, populated with nulls and
//! defaults; only the confidence scores and the nulls themselves signal
//! degradation.

pub mod schema;
pub mod validate;

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;

/// Schema version stamped into every card.
pub const CARD_VERSION: &str = "1.0";

/// Canonical weather condition vocabulary.
///
/// Provider taxonomies are mapped onto this enum by
/// [`crate::classify::canonical_condition`]; unmapped raw values become
/// `Unknown`, never `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalCondition {
    Clear,
    PartlyCloudy,
    Overcast,
    LightRain,
    Rain,
    Snow,
    Fog,
    Thunderstorm,
    Unknown,
}

impl CanonicalCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::PartlyCloudy => "partly_cloudy",
            Self::Overcast => "overcast",
            Self::LightRain => "light_rain",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Fog => "fog",
            Self::Thunderstorm => "thunderstorm",
            Self::Unknown => "unknown",
        }
    }
}

/// Building height bucket derived from estimated story count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingHeight {
    Lowrise,
    Midrise,
    Highrise,
    Unknown,
}

/// Building density bucket derived from footprint count within the query
/// radius. Cutpoints are fixed constants in [`crate::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingDensity {
    Sparse,
    Medium,
    Dense,
    Unknown,
}

/// Dominant road class near the point, highest-ranked class wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    Pedestrian,
    Unclassified,
}

/// Coarse scene class derived from land-use category counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    UrbanCommercial,
    UrbanResidential,
    Parkland,
    RuralFarmland,
    Industrial,
    MixedUrban,
}

/// Verbatim input facts, echoed into the card untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFacts {
    pub lat: f64,
    pub lon: f64,
    /// Camera heading, clockwise from north, if the caller supplied one.
    pub heading_deg: Option<f64>,
    /// Local wall-clock time with its UTC offset.
    pub datetime_local: DateTime<FixedOffset>,
    /// IANA timezone name; its offset must match `datetime_local` at that
    /// instant (checked during input validation and again by the validator).
    pub timezone: String,
}

/// Administrative labels from the reverse geocoder.
///
/// Everything is optional except `display_name`, which falls back to the
/// raw coordinates when geocoding fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub display_name: String,
    pub road: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

impl Location {
    /// Degraded shape: coordinates stand in for the display name.
    pub fn coordinate_fallback(lat: f64, lon: f64) -> Self {
        Self {
            display_name: format!("{lat:.5}, {lon:.5}"),
            road: None,
            suburb: None,
            city: None,
            state: None,
            postcode: None,
            country: None,
            country_code: None,
        }
    }
}

/// Classified map elements within the query radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapElements {
    pub road_type: Option<RoadType>,
    pub sidewalk: bool,
    pub water: bool,
    pub park: bool,
    pub building_height_hint: BuildingHeight,
    pub building_density: BuildingDensity,
    /// Short labels, most-notable-first, bounded by the adapter caps.
    pub pois: Vec<String>,
}

impl Default for BuildingHeight {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Default for BuildingDensity {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Map-feature summary around the point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapContext {
    /// Distinct land-use categories seen within the radius. A sorted set:
    /// insertion order is irrelevant and serialization is deterministic.
    pub landuse: BTreeSet<String>,
    pub place_type: Option<PlaceType>,
    pub elements: MapElements,
}

/// Solar geometry plus the four lighting flags derived from elevation.
///
/// The flags are computed fields. They are always recomputed from
/// `elevation_deg` via [`crate::classify::SunFlags`] and never supplied
/// independently; the validator rejects cards where they disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunGeometry {
    /// Degrees clockwise from north, normalized into [0, 360).
    pub azimuth_deg: Option<f64>,
    /// Degrees above the horizon, in [-90, 90].
    pub elevation_deg: Option<f64>,
    pub is_day: bool,
    pub is_night: bool,
    pub is_blue_hour: bool,
    pub is_golden_hour: bool,
}

impl SunGeometry {
    /// Build from a computed position; flags derive from the elevation.
    pub fn from_position(azimuth_deg: f64, elevation_deg: f64) -> Self {
        let az = crate::normalize::normalize_azimuth(azimuth_deg);
        let el = crate::normalize::clamp_elevation(elevation_deg);
        let flags = crate::classify::SunFlags::from_elevation(el);
        Self {
            azimuth_deg: Some(az),
            elevation_deg: Some(el),
            is_day: flags.is_day,
            is_night: flags.is_night,
            is_blue_hour: flags.is_blue_hour,
            is_golden_hour: flags.is_golden_hour,
        }
    }

    /// Degraded shape: no position, every flag false.
    pub fn unavailable() -> Self {
        Self {
            azimuth_deg: None,
            elevation_deg: None,
            is_day: false,
            is_night: false,
            is_blue_hour: false,
            is_golden_hour: false,
        }
    }
}

/// Weather observation, canonical units: °C, mm, m/s, km.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub condition: CanonicalCondition,
    pub temperature_c: Option<f64>,
    pub precip_mm: Option<f64>,
    pub wind_mps: Option<f64>,
    pub visibility_km: Option<f64>,
    /// Derived: wet condition set or measurable precipitation.
    pub wet_ground: bool,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            condition: CanonicalCondition::Unknown,
            temperature_c: None,
            precip_mm: None,
            wind_mps: None,
            visibility_km: None,
            wet_ground: false,
        }
    }
}

/// Climate classification for the point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Climate {
    /// Köppen–Geiger code, e.g. "Cfb".
    pub koppen: Option<String>,
    /// Seasonal foliage state for the day of year, where known.
    pub leaf_on: Option<bool>,
}

/// Which adapter produced each section, and when the card was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub geocoder: Option<String>,
    pub map_context: Option<String>,
    pub sun: Option<String>,
    pub weather: Option<String>,
    pub climate: Option<String>,
    /// Construction instant, set once at assembly.
    pub created_at_utc: DateTime<Utc>,
}

/// The assembled scene card.
///
/// Immutable once validated: regeneration means a new card with a new
/// `id` and `created_at_utc`, never mutation of an emitted one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCard {
    pub version: String,
    /// `sc_<compact-utc>_<lat:5dp>_<lon:5dp>`; best-effort uniqueness only,
    /// see [`crate::ident::scene_id`].
    pub id: String,
    pub source: SourceFacts,
    pub location: Location,
    pub map_context: MapContext,
    pub sun: SunGeometry,
    pub weather: Weather,
    pub climate: Climate,
    pub prompt: String,
    /// Free text, never interpreted by the pipeline.
    pub notes: Option<String>,
    pub provenance: Provenance,
    pub confidence: Confidence,
}

impl SceneCard {
    /// Serialize to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("scene card serialization is infallible")
    }

    /// Parse a card from JSON, re-running full validation.
    pub fn from_json(json: &str) -> Result<Self, validate::ValidationError> {
        let card: SceneCard = serde_json::from_str(json)
            .map_err(|e| validate::ValidationError::Structural(e.to_string()))?;
        validate::validate_card(&card)?;
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_serializes_snake_case() {
        let v = serde_json::to_value(CanonicalCondition::PartlyCloudy).unwrap();
        assert_eq!(v, serde_json::json!("partly_cloudy"));
        assert_eq!(CanonicalCondition::LightRain.as_str(), "light_rain");
    }

    #[test]
    fn degraded_sections_keep_shape() {
        let loc = Location::coordinate_fallback(48.85837, 2.29448);
        assert_eq!(loc.display_name, "48.85837, 2.29448");
        assert!(loc.country.is_none());

        let sun = SunGeometry::unavailable();
        let v = serde_json::to_value(&sun).unwrap();
        assert!(v.get("azimuth_deg").unwrap().is_null());
        assert_eq!(v.get("is_day").unwrap(), &serde_json::json!(false));
    }

    #[test]
    fn sun_from_position_wraps_azimuth() {
        let sun = SunGeometry::from_position(-30.0, 7.0);
        assert_eq!(sun.azimuth_deg, Some(330.0));
        assert!(sun.is_day);
        assert!(sun.is_golden_hour);
        assert!(!sun.is_night);
    }

    #[test]
    fn landuse_set_order_is_stable() {
        let mut a = MapContext::default();
        a.landuse.insert("retail".to_string());
        a.landuse.insert("park".to_string());
        let mut b = MapContext::default();
        b.landuse.insert("park".to_string());
        b.landuse.insert("retail".to_string());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
