//! Latitude-belt climate heuristic.
//!
//! A stand-in for a real Köppen–Geiger raster lookup: the class is guessed
//! coarsely from the latitude belt, and the leaf-on state from the day of
//! year within that belt. Callers with a raster service implement
//! [`ClimateLookup`] over it instead; this default keeps the card's
//! climate section populated without one.

use scenecard_core::ClimateFacts;

use super::ClimateLookup;

/// Coarse built-in climate provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatitudeBeltClimate;

impl LatitudeBeltClimate {
    pub fn new() -> Self {
        Self
    }
}

fn koppen_for_latitude(lat: f64) -> &'static str {
    let abs_lat = lat.abs();
    if abs_lat < 10.0 {
        "Af" // equatorial rainforest
    } else if abs_lat < 23.0 {
        "Aw" // tropical savanna
    } else if abs_lat < 35.0 {
        "BSh" // subtropical steppe
    } else if abs_lat < 55.0 {
        "Cfb" // temperate oceanic
    } else {
        "Dfb" // continental
    }
}

fn leaf_on(koppen: &str, day_of_year: u32) -> bool {
    match koppen {
        // temperate/continental: roughly May through October
        "Cfb" | "Dfb" => (120..=300).contains(&day_of_year),
        // tropics keep their leaves
        "Af" | "Aw" => true,
        _ => (150..=280).contains(&day_of_year),
    }
}

impl ClimateLookup for LatitudeBeltClimate {
    fn lookup(&self, lat: f64, _lon: f64, day_of_year: u32) -> Option<ClimateFacts> {
        let koppen = koppen_for_latitude(lat);
        Some(ClimateFacts {
            koppen: Some(koppen.to_string()),
            leaf_on: Some(leaf_on(koppen, day_of_year)),
        })
    }

    fn name(&self) -> &str {
        "latitude-belt/0.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paris_is_temperate_oceanic() {
        let facts = LatitudeBeltClimate.lookup(48.85837, 2.29448, 180).unwrap();
        assert_eq!(facts.koppen.as_deref(), Some("Cfb"));
        assert_eq!(facts.leaf_on, Some(true));
    }

    #[test]
    fn paris_in_january_is_leaf_off() {
        let facts = LatitudeBeltClimate.lookup(48.85837, 2.29448, 15).unwrap();
        assert_eq!(facts.leaf_on, Some(false));
    }

    #[test]
    fn singapore_is_equatorial_and_evergreen() {
        let facts = LatitudeBeltClimate.lookup(1.35208, 103.81984, 15).unwrap();
        assert_eq!(facts.koppen.as_deref(), Some("Af"));
        assert_eq!(facts.leaf_on, Some(true));
    }

    #[test]
    fn southern_latitudes_use_absolute_belt() {
        let facts = LatitudeBeltClimate.lookup(-41.28664, 174.77557, 15).unwrap();
        assert_eq!(facts.koppen.as_deref(), Some("Cfb"));
    }
}
