//! Per-section confidence scores.
//!
//! Scores are heuristic reliability indicators, not ground truth. The one
//! hard requirement is monotonicity: adding corroborating fields to a
//! section never lowers its score, and an unavailable adapter always scores
//! zero. Callers inspect these instead of exceptions to detect degraded
//! cards.

use serde::{Deserialize, Serialize};

use crate::card::RoadType;
use crate::facts::{GeocodeFacts, MapFacts, SunFacts, Unavailable, WeatherFacts};
use chrono::NaiveDate;

/// One score in [0, 1] per card section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub location: f64,
    pub map_context: f64,
    pub sun: f64,
    pub weather: f64,
}

impl Confidence {
    /// All-minimum scores, the shape a fully degraded card carries.
    pub fn floor() -> Self {
        Self {
            location: 0.0,
            map_context: 0.0,
            sun: 0.0,
            weather: 0.0,
        }
    }
}

fn clamp(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

/// Score the location section.
///
/// 1.0 with a resolved city and country, 0.5 with country only, 0.25 for a
/// bare display name, 0.0 when the geocoder was unavailable.
pub fn location_score(outcome: &Result<GeocodeFacts, Unavailable>) -> f64 {
    let Ok(facts) = outcome else { return 0.0 };
    let has_city = facts.city.is_some() || facts.suburb.is_some();
    let score = if has_city && facts.country.is_some() {
        1.0
    } else if facts.country.is_some() {
        0.5
    } else {
        0.25
    };
    clamp(score)
}

/// Score the map-context section by how many of {landuse, road type, POIs}
/// came back non-empty. Floors at 0.25 when the adapter answered at all;
/// 0.0 only when it was wholly unavailable.
pub fn map_context_score(
    outcome: &Result<MapFacts, Unavailable>,
    road_type: Option<RoadType>,
) -> f64 {
    let Ok(facts) = outcome else { return 0.0 };
    let mut present = 0u32;
    if !facts.landuse.is_empty() {
        present += 1;
    }
    if road_type.is_some() {
        present += 1;
    }
    if !facts.pois.is_empty() {
        present += 1;
    }
    clamp((1 + present) as f64 / 4.0)
}

/// Score the sun section. The position is a deterministic calculation, so
/// any settled result scores 1.0; only an unavailable calculator (which
/// indicates invalid input time, itself fatal earlier) scores 0.0.
pub fn sun_score(outcome: &Result<SunFacts, Unavailable>) -> f64 {
    if outcome.is_ok() {
        1.0
    } else {
        0.0
    }
}

/// Score the weather section by observation recency: 1.0 when the
/// observation is dated to the requested local date, 0.5 when it is dated
/// differently or undated, 0.0 when unavailable.
pub fn weather_score(
    outcome: &Result<WeatherFacts, Unavailable>,
    requested_date: NaiveDate,
) -> f64 {
    let Ok(facts) = outcome else { return 0.0 };
    match facts.observation_date {
        Some(d) if d == requested_date => 1.0,
        _ => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn location_tiers() {
        let full = GeocodeFacts {
            city: Some("Paris".into()),
            country: Some("France".into()),
            ..Default::default()
        };
        assert_eq!(location_score(&Ok(full)), 1.0);

        let country_only = GeocodeFacts {
            country: Some("France".into()),
            ..Default::default()
        };
        assert_eq!(location_score(&Ok(country_only)), 0.5);

        let bare = GeocodeFacts::default();
        assert_eq!(location_score(&Ok(bare)), 0.25);

        assert_eq!(
            location_score(&Err(Unavailable::NotConfigured)),
            0.0
        );
    }

    #[test]
    fn map_context_counts_fields() {
        let empty = MapFacts::default();
        assert_eq!(map_context_score(&Ok(empty.clone()), None), 0.25);

        let mut rich = empty;
        rich.landuse.insert("residential".into(), 4);
        rich.pois.push("Café de Flore".into());
        assert_eq!(
            map_context_score(&Ok(rich), Some(RoadType::Residential)),
            1.0
        );

        assert_eq!(
            map_context_score(&Err(Unavailable::NotConfigured), None),
            0.0
        );
    }

    #[test]
    fn weather_recency() {
        let requested = date(2025, 10, 9);
        let same_day = WeatherFacts {
            observation_date: Some(requested),
            ..Default::default()
        };
        assert_eq!(weather_score(&Ok(same_day), requested), 1.0);

        let stale = WeatherFacts {
            observation_date: Some(date(2025, 10, 7)),
            ..Default::default()
        };
        assert_eq!(weather_score(&Ok(stale), requested), 0.5);

        let undated = WeatherFacts::default();
        assert_eq!(weather_score(&Ok(undated), requested), 0.5);

        assert_eq!(
            weather_score(&Err(Unavailable::NotConfigured), requested),
            0.0
        );
    }

    // More corroborating fields never lowers the map-context score.
    proptest! {
        #[test]
        fn map_context_is_monotonic(
            landuse in any::<bool>(),
            pois in any::<bool>(),
            road in any::<bool>(),
        ) {
            let mut base = MapFacts::default();
            if landuse {
                base.landuse.insert("residential".into(), 1);
            }
            if pois {
                base.pois.push("poi".into());
            }
            let road_type = road.then_some(RoadType::Primary);
            let score = map_context_score(&Ok(base.clone()), road_type);

            // add one more corroborating field to a copy
            let mut richer = base;
            richer.landuse.insert("retail".into(), 1);
            let richer_score = map_context_score(&Ok(richer), road_type);
            prop_assert!(richer_score >= score);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
