//! Weather condition canonicalization and the wet-ground flag.
//!
//! Providers each speak their own condition taxonomy ("Patchy light
//! drizzle", "broken clouds", WMO code 61...). The rule table below maps
//! free-text labels onto the fixed canonical vocabulary. Order matters:
//! the first matching rule wins, so compound phrases ("light rain shower",
//! "thundery rain") resolve to their most specific bucket. Anything
//! unmatched falls to `Unknown`, never to `Clear`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::card::CanonicalCondition;

lazy_static! {
    /// Ordered (pattern, condition) rule table. First match wins.
    static ref CONDITION_RULES: Vec<(Regex, CanonicalCondition)> = vec![
        (
            Regex::new(r"(?i)thunder|t-?storm|lightning").unwrap(),
            CanonicalCondition::Thunderstorm,
        ),
        (
            Regex::new(r"(?i)snow|sleet|flurr|blizzard|ice pellets|freezing rain").unwrap(),
            CanonicalCondition::Snow,
        ),
        (
            Regex::new(r"(?i)fog|mist|haze|smoke").unwrap(),
            CanonicalCondition::Fog,
        ),
        (
            Regex::new(r"(?i)drizzle|light rain|light shower").unwrap(),
            CanonicalCondition::LightRain,
        ),
        (
            Regex::new(r"(?i)rain|shower|downpour").unwrap(),
            CanonicalCondition::Rain,
        ),
        (
            Regex::new(r"(?i)partly|scattered|few clouds|broken clouds").unwrap(),
            CanonicalCondition::PartlyCloudy,
        ),
        (
            Regex::new(r"(?i)overcast|cloud").unwrap(),
            CanonicalCondition::Overcast,
        ),
        (
            Regex::new(r"(?i)clear|sunn?y|fair").unwrap(),
            CanonicalCondition::Clear,
        ),
    ];
}

/// Precipitation at or above this depth marks the ground wet, whatever the
/// condition label says.
pub const WET_PRECIP_MM: f64 = 0.2;

/// Map a raw provider condition label onto the canonical vocabulary.
pub fn canonical_condition(raw: &str) -> CanonicalCondition {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CanonicalCondition::Unknown;
    }
    for (pattern, condition) in CONDITION_RULES.iter() {
        if pattern.is_match(trimmed) {
            return *condition;
        }
    }
    CanonicalCondition::Unknown
}

/// Whether the ground reads as wet.
///
/// True when the condition is in the wet set (fog included: condensation
/// sheens pavement regardless of measured precipitation) or when
/// precipitation reaches [`WET_PRECIP_MM`]. Null precipitation with a dry
/// condition is false.
pub fn wet_ground(condition: CanonicalCondition, precip_mm: Option<f64>) -> bool {
    use CanonicalCondition::*;
    let wet_condition = matches!(condition, LightRain | Rain | Snow | Thunderstorm | Fog);
    let wet_precip = precip_mm.map(|p| p >= WET_PRECIP_MM).unwrap_or(false);
    wet_condition || wet_precip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_labels_map_to_buckets() {
        assert_eq!(canonical_condition("Patchy light drizzle"), CanonicalCondition::LightRain);
        assert_eq!(canonical_condition("Moderate rain"), CanonicalCondition::Rain);
        assert_eq!(canonical_condition("broken clouds"), CanonicalCondition::PartlyCloudy);
        assert_eq!(canonical_condition("Overcast"), CanonicalCondition::Overcast);
        assert_eq!(canonical_condition("Sunny"), CanonicalCondition::Clear);
        assert_eq!(canonical_condition("Thundery outbreaks"), CanonicalCondition::Thunderstorm);
        assert_eq!(canonical_condition("Freezing rain"), CanonicalCondition::Snow);
        assert_eq!(canonical_condition("Fog"), CanonicalCondition::Fog);
    }

    #[test]
    fn unmapped_labels_fall_to_unknown() {
        assert_eq!(canonical_condition("sandstorm"), CanonicalCondition::Unknown);
        assert_eq!(canonical_condition(""), CanonicalCondition::Unknown);
        assert_eq!(canonical_condition("   "), CanonicalCondition::Unknown);
    }

    #[test]
    fn compound_phrases_pick_most_specific() {
        // "light rain shower" must not land in the generic rain bucket
        assert_eq!(canonical_condition("Light rain shower"), CanonicalCondition::LightRain);
        // thunder outranks the rain it arrives with
        assert_eq!(canonical_condition("Thunderstorm with heavy rain"), CanonicalCondition::Thunderstorm);
    }

    #[test]
    fn fog_is_wet_without_precipitation() {
        assert!(wet_ground(CanonicalCondition::Fog, None));
    }

    #[test]
    fn dry_condition_with_null_precip_is_dry() {
        assert!(!wet_ground(CanonicalCondition::Clear, None));
        assert!(!wet_ground(CanonicalCondition::Unknown, None));
    }

    #[test]
    fn precipitation_threshold() {
        assert!(!wet_ground(CanonicalCondition::Overcast, Some(0.1)));
        assert!(wet_ground(CanonicalCondition::Overcast, Some(0.2)));
        assert!(wet_ground(CanonicalCondition::Clear, Some(3.0)));
    }
}
