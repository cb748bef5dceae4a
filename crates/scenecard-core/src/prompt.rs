//! The prompt distiller.
//!
//! Turns assembled card fields into a one-to-two sentence natural-language
//! description. No randomness anywhere: identical card fields always yield
//! byte-identical text. Enum values are humanized before they reach the
//! prompt; internal codes and null placeholders never do.
//!
//! Shared stylistic constraints ride in a [`PromptStyle`] value passed
//! explicitly by the caller. There is no hidden global; two pipelines with
//! different styles coexist in one process.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::card::{
    BuildingDensity, BuildingHeight, CanonicalCondition, MapContext, PlaceType, RoadType,
    SourceFacts, SunGeometry, Weather,
};
use crate::classify::SunFlags;

/// Errors loading a prompt style document.
#[derive(Error, Debug)]
pub enum PromptStyleError {
    #[error("failed to read style file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse style YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Immutable stylistic constraints applied to every distilled prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptStyle {
    /// Trailing clause appended to the conditions sentence, e.g.
    /// `"natural colors, 35mm look"`.
    #[serde(default)]
    pub style_suffix: Option<String>,

    /// How many POI labels the scene sentence may mention.
    #[serde(default = "default_max_pois")]
    pub max_pois: usize,
}

fn default_max_pois() -> usize {
    1
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self {
            style_suffix: None,
            max_pois: default_max_pois(),
        }
    }
}

impl PromptStyle {
    /// Parse a style from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, PromptStyleError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a style from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PromptStyleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}

fn place_phrase(place: Option<PlaceType>) -> &'static str {
    match place {
        Some(PlaceType::UrbanCommercial) => "urban commercial streetscape",
        Some(PlaceType::UrbanResidential) => "urban residential streetscape",
        Some(PlaceType::Parkland) => "parkland scene",
        Some(PlaceType::RuralFarmland) => "rural farmland scene",
        Some(PlaceType::Industrial) => "industrial streetscape",
        Some(PlaceType::MixedUrban) => "mixed urban streetscape",
        None => "street-level scene",
    }
}

fn road_phrase(road: RoadType) -> &'static str {
    match road {
        RoadType::Motorway => "a motorway",
        RoadType::Trunk => "a trunk road",
        RoadType::Primary => "a primary road",
        RoadType::Secondary => "a secondary road",
        RoadType::Tertiary => "a tertiary road",
        RoadType::Residential => "a residential street",
        RoadType::Service => "a service lane",
        RoadType::Pedestrian => "a pedestrian way",
        RoadType::Unclassified => "a minor road",
    }
}

fn density_word(density: BuildingDensity) -> Option<&'static str> {
    match density {
        BuildingDensity::Sparse => Some("sparse"),
        BuildingDensity::Medium => Some("moderately spaced"),
        BuildingDensity::Dense => Some("dense"),
        BuildingDensity::Unknown => None,
    }
}

fn height_word(height: BuildingHeight) -> Option<&'static str> {
    match height {
        BuildingHeight::Lowrise => Some("lowrise"),
        BuildingHeight::Midrise => Some("midrise"),
        BuildingHeight::Highrise => Some("highrise"),
        BuildingHeight::Unknown => None,
    }
}

fn condition_phrase(condition: CanonicalCondition) -> Option<&'static str> {
    match condition {
        CanonicalCondition::Clear => Some("clear skies"),
        CanonicalCondition::PartlyCloudy => Some("partly cloudy skies"),
        CanonicalCondition::Overcast => Some("overcast skies"),
        CanonicalCondition::LightRain => Some("light rain"),
        CanonicalCondition::Rain => Some("rain"),
        CanonicalCondition::Snow => Some("snow"),
        CanonicalCondition::Fog => Some("fog"),
        CanonicalCondition::Thunderstorm => Some("a thunderstorm"),
        CanonicalCondition::Unknown => None,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Distill card fields into the prompt text.
///
/// Output is one scene sentence plus, when any condition data exists, one
/// conditions sentence. When every section is degraded the scene sentence
/// falls back to a coordinate/time description, so the prompt is never
/// empty.
pub fn distill(
    source: &SourceFacts,
    map: &MapContext,
    weather: &Weather,
    sun: &SunGeometry,
    style: &PromptStyle,
) -> String {
    let scene = scene_sentence(source, map, style);
    let conditions = conditions_sentence(weather, sun, style);

    match conditions {
        Some(c) => format!("{scene} {c}"),
        None => scene,
    }
}

fn scene_sentence(source: &SourceFacts, map: &MapContext, style: &PromptStyle) -> String {
    let elements = &map.elements;
    let has_map_data = map.place_type.is_some()
        || elements.road_type.is_some()
        || !elements.pois.is_empty()
        || elements.building_height_hint != BuildingHeight::Unknown;

    if !has_map_data {
        // Fully degraded map context: describe the point itself.
        return format!(
            "Street-level scene at {:.5}, {:.5} on {} at {} local time.",
            source.lat,
            source.lon,
            source.datetime_local.format("%Y-%m-%d"),
            source.datetime_local.format("%H:%M"),
        );
    }

    let mut sentence = capitalize(place_phrase(map.place_type));

    let pois: Vec<&str> = elements
        .pois
        .iter()
        .take(style.max_pois)
        .map(String::as_str)
        .collect();
    if !pois.is_empty() {
        sentence.push_str(" near ");
        sentence.push_str(&pois.join(" and "));
    }

    if let Some(road) = elements.road_type {
        sentence.push_str(", along ");
        sentence.push_str(road_phrase(road));
        if elements.sidewalk {
            sentence.push_str(" with a sidewalk");
        }
    }

    let buildings: Vec<&str> = [
        density_word(elements.building_density),
        height_word(elements.building_height_hint),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !buildings.is_empty() {
        sentence.push_str(", lined with ");
        sentence.push_str(&buildings.join(" "));
        sentence.push_str(" buildings");
    }

    sentence.push('.');
    sentence
}

fn conditions_sentence(
    weather: &Weather,
    sun: &SunGeometry,
    style: &PromptStyle,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if let Some(condition) = condition_phrase(weather.condition) {
        parts.push(condition.to_string());
    }
    if weather.wet_ground {
        parts.push("wet ground".to_string());
    }
    if let Some(t) = weather.temperature_c {
        parts.push(format!("{t:.0}\u{b0}C"));
    }
    if let Some(elevation) = sun.elevation_deg {
        let phase = SunFlags::from_elevation(elevation).lighting_phase();
        parts.push(format!("{phase} light"));
    }
    if let Some(suffix) = style.style_suffix.as_deref() {
        if !suffix.trim().is_empty() {
            parts.push(suffix.trim().to_string());
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(format!("{}.", capitalize(&parts.join(", "))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::MapElements;
    use chrono::DateTime;

    fn source() -> SourceFacts {
        SourceFacts {
            lat: 48.85837,
            lon: 2.29448,
            heading_deg: None,
            datetime_local: DateTime::parse_from_rfc3339("2025-10-09T13:20:00+02:00").unwrap(),
            timezone: "Europe/Paris".to_string(),
        }
    }

    fn rich_map() -> MapContext {
        MapContext {
            landuse: ["residential".to_string()].into_iter().collect(),
            place_type: Some(PlaceType::UrbanResidential),
            elements: MapElements {
                road_type: Some(RoadType::Residential),
                sidewalk: true,
                water: false,
                park: false,
                building_height_hint: BuildingHeight::Midrise,
                building_density: BuildingDensity::Dense,
                pois: vec!["Café de Flore".to_string()],
            },
        }
    }

    fn wet_weather() -> Weather {
        Weather {
            condition: CanonicalCondition::Overcast,
            temperature_c: Some(7.4),
            precip_mm: Some(0.4),
            wind_mps: Some(3.1),
            visibility_km: Some(8.0),
            wet_ground: true,
        }
    }

    #[test]
    fn full_card_prompt() {
        let prompt = distill(
            &source(),
            &rich_map(),
            &wet_weather(),
            &SunGeometry::from_position(180.0, 7.0),
            &PromptStyle::default(),
        );
        assert_eq!(
            prompt,
            "Urban residential streetscape near Café de Flore, along a residential street \
             with a sidewalk, lined with dense midrise buildings. \
             Overcast skies, wet ground, 7\u{b0}C, golden hour light."
        );
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = distill(
            &source(),
            &rich_map(),
            &wet_weather(),
            &SunGeometry::from_position(180.0, 35.0),
            &PromptStyle::default(),
        );
        let b = distill(
            &source(),
            &rich_map(),
            &wet_weather(),
            &SunGeometry::from_position(180.0, 35.0),
            &PromptStyle::default(),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn degraded_card_falls_back_to_coordinates() {
        let prompt = distill(
            &source(),
            &MapContext::default(),
            &Weather::default(),
            &SunGeometry::unavailable(),
            &PromptStyle::default(),
        );
        assert_eq!(
            prompt,
            "Street-level scene at 48.85837, 2.29448 on 2025-10-09 at 13:20 local time."
        );
        assert!(!prompt.is_empty());
        // no raw artifacts leak through
        assert!(!prompt.contains("unknown"));
        assert!(!prompt.contains("null"));
    }

    #[test]
    fn at_most_two_sentences() {
        let prompt = distill(
            &source(),
            &rich_map(),
            &wet_weather(),
            &SunGeometry::from_position(180.0, -30.0),
            &PromptStyle {
                style_suffix: Some("natural colors, 35mm look".to_string()),
                max_pois: 2,
            },
        );
        assert_eq!(prompt.matches(". ").count() + 1, 2);
        assert!(prompt.ends_with("natural colors, 35mm look."));
        assert!(prompt.contains("night light"));
    }

    #[test]
    fn lighting_priority_night_over_twilight() {
        let night = SunGeometry::from_position(10.0, -12.0);
        let blue = SunGeometry::from_position(10.0, -3.0);
        let p_night = distill(
            &source(),
            &rich_map(),
            &Weather::default(),
            &night,
            &PromptStyle::default(),
        );
        let p_blue = distill(
            &source(),
            &rich_map(),
            &Weather::default(),
            &blue,
            &PromptStyle::default(),
        );
        assert!(p_night.contains("night light"));
        assert!(p_blue.contains("blue hour light"));
    }

    #[test]
    fn unknown_condition_emits_no_weather_clause() {
        let prompt = distill(
            &source(),
            &rich_map(),
            &Weather::default(),
            &SunGeometry::unavailable(),
            &PromptStyle::default(),
        );
        // scene sentence only
        assert!(prompt.ends_with("buildings."));
        assert!(!prompt.contains("unknown"));
    }

    #[test]
    fn style_loads_from_yaml() {
        let style = PromptStyle::from_yaml("style_suffix: photoreal\nmax_pois: 3\n").unwrap();
        assert_eq!(style.style_suffix.as_deref(), Some("photoreal"));
        assert_eq!(style.max_pois, 3);

        let default = PromptStyle::from_yaml("{}").unwrap();
        assert_eq!(default, PromptStyle::default());
    }
}
