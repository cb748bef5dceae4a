//! Full card validation.
//!
//! Checks run in a fixed order: the structural schema pass (required keys,
//! types, enum membership, numeric ranges) and then the cross-field checks
//! the schema language cannot express: sun-flag consistency with
//! elevation, and offset-vs-timezone agreement. The first violation found
//! is reported; nothing is repaired. A validation failure after assembly
//! means a bug in assembly, not bad provider data.

use std::str::FromStr;

use chrono::{Offset, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

use crate::card::SceneCard;
use crate::classify::SunFlags;

/// A card that failed validation, with the violated rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("structural violation: {0}")]
    Structural(String),

    #[error("sun position fields must be both present or both null (azimuth {azimuth:?}, elevation {elevation:?})")]
    SunPositionSplit {
        azimuth: Option<f64>,
        elevation: Option<f64>,
    },

    #[error("sun flag {flag} disagrees with elevation {elevation:?}")]
    SunFlagInconsistent {
        flag: &'static str,
        elevation: Option<f64>,
    },

    #[error("source timezone is not a known IANA zone: {0}")]
    UnknownTimezone(String),

    #[error("source offset {offset} does not match timezone {timezone} at that instant")]
    OffsetInconsistent { timezone: String, offset: String },
}

/// Validate an assembled card.
pub fn validate_card(card: &SceneCard) -> Result<(), ValidationError> {
    // 1. Structural pass: required keys, types, enums, numeric ranges.
    let json = serde_json::to_value(card)
        .map_err(|e| ValidationError::Structural(e.to_string()))?;
    super::schema::validate_card_schema(&json).map_err(ValidationError::Structural)?;

    // 2. Sun position fields travel together.
    if card.sun.azimuth_deg.is_some() != card.sun.elevation_deg.is_some() {
        return Err(ValidationError::SunPositionSplit {
            azimuth: card.sun.azimuth_deg,
            elevation: card.sun.elevation_deg,
        });
    }

    // 3. The four flags must equal what the elevation derives to. An
    // unavailable sun section derives to all-false.
    let expected = match card.sun.elevation_deg {
        Some(e) => SunFlags::from_elevation(e),
        None => SunFlags {
            is_day: false,
            is_night: false,
            is_blue_hour: false,
            is_golden_hour: false,
        },
    };
    let checks = [
        ("is_day", card.sun.is_day, expected.is_day),
        ("is_night", card.sun.is_night, expected.is_night),
        ("is_blue_hour", card.sun.is_blue_hour, expected.is_blue_hour),
        (
            "is_golden_hour",
            card.sun.is_golden_hour,
            expected.is_golden_hour,
        ),
    ];
    for (flag, stored, derived) in checks {
        if stored != derived {
            return Err(ValidationError::SunFlagInconsistent {
                flag,
                elevation: card.sun.elevation_deg,
            });
        }
    }

    // 4. Offset-vs-timezone agreement, same rule as input validation.
    let tz = Tz::from_str(&card.source.timezone)
        .map_err(|_| ValidationError::UnknownTimezone(card.source.timezone.clone()))?;
    let expected_offset = tz
        .from_utc_datetime(&card.source.datetime_local.naive_utc())
        .offset()
        .fix();
    if expected_offset != *card.source.datetime_local.offset() {
        return Err(ValidationError::OffsetInconsistent {
            timezone: card.source.timezone.clone(),
            offset: card.source.datetime_local.offset().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{
        Climate, Location, MapContext, Provenance, SourceFacts, SunGeometry, Weather, CARD_VERSION,
    };
    use crate::confidence::Confidence;
    use chrono::{DateTime, Utc};

    fn valid_card() -> SceneCard {
        let datetime_local =
            DateTime::parse_from_rfc3339("2025-10-09T13:20:00+02:00").unwrap();
        let created_at = datetime_local.with_timezone(&Utc);
        SceneCard {
            version: CARD_VERSION.to_string(),
            id: crate::ident::scene_id(created_at, 48.85837, 2.29448),
            source: SourceFacts {
                lat: 48.85837,
                lon: 2.29448,
                heading_deg: None,
                datetime_local,
                timezone: "Europe/Paris".to_string(),
            },
            location: Location::coordinate_fallback(48.85837, 2.29448),
            map_context: MapContext::default(),
            sun: SunGeometry::from_position(210.0, 32.5),
            weather: Weather::default(),
            climate: Climate::default(),
            prompt: "Street-level scene at 48.85837, 2.29448.".to_string(),
            notes: None,
            provenance: Provenance {
                geocoder: None,
                map_context: None,
                sun: Some("noaa-spa/0.1".to_string()),
                weather: None,
                climate: None,
                created_at_utc: created_at,
            },
            confidence: Confidence {
                location: 0.0,
                map_context: 0.0,
                sun: 1.0,
                weather: 0.0,
            },
        }
    }

    #[test]
    fn assembled_card_validates() {
        assert_eq!(validate_card(&valid_card()), Ok(()));
    }

    #[test]
    fn tampered_sun_flag_is_caught() {
        let mut card = valid_card();
        card.sun.is_night = true; // elevation is 32.5, this cannot hold
        assert!(matches!(
            validate_card(&card),
            Err(ValidationError::SunFlagInconsistent { flag: "is_night", .. })
        ));
    }

    #[test]
    fn split_sun_position_is_caught() {
        let mut card = valid_card();
        card.sun.elevation_deg = None;
        assert!(matches!(
            validate_card(&card),
            Err(ValidationError::SunPositionSplit { .. })
        ));
    }

    #[test]
    fn wrong_offset_is_caught() {
        let mut card = valid_card();
        card.source.datetime_local =
            DateTime::parse_from_rfc3339("2025-10-09T13:20:00+07:00").unwrap();
        assert!(matches!(
            validate_card(&card),
            Err(ValidationError::OffsetInconsistent { .. })
        ));
    }

    #[test]
    fn empty_prompt_is_structural() {
        let mut card = valid_card();
        card.prompt = String::new();
        assert!(matches!(
            validate_card(&card),
            Err(ValidationError::Structural(_))
        ));
    }

    #[test]
    fn structural_pass_runs_before_cross_field() {
        let mut card = valid_card();
        card.prompt = String::new(); // structural violation
        card.sun.is_night = true; // cross-field violation
        // the structural one is reported first
        assert!(matches!(
            validate_card(&card),
            Err(ValidationError::Structural(_))
        ));
    }

    #[test]
    fn round_trip_preserves_card() {
        let card = valid_card();
        let json = serde_json::to_string(&card).unwrap();
        let parsed = SceneCard::from_json(&json).unwrap();
        assert_eq!(card, parsed);
    }
}
