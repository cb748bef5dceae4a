//! Coarse place-type classification from land-use makeup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::card::PlaceType;

/// Category tallies for map features within the query radius.
///
/// Raw OSM-style tag values fold into this fixed category vector; the
/// decision table in [`place_type`] runs over it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanduseCounts {
    pub residential: u32,
    pub retail: u32,
    pub industrial: u32,
    pub commercial: u32,
    pub park: u32,
    pub forest: u32,
    pub water: u32,
    pub farmland: u32,
    pub road_major: u32,
    pub road_minor: u32,
    pub building: u32,
}

impl LanduseCounts {
    /// Fold raw `landuse=*` value counts into the category vector.
    ///
    /// Synonyms collapse: grass/meadow/recreation grounds count as park,
    /// wood as forest, orchards and vineyards as farmland.
    pub fn tally_landuse(&mut self, value: &str, count: u32) {
        match value {
            "residential" => self.residential += count,
            "retail" => self.retail += count,
            "industrial" => self.industrial += count,
            "commercial" => self.commercial += count,
            "park" => self.park += count,
            "grass" | "meadow" | "recreation_ground" => self.park += count,
            "forest" | "wood" => self.forest += count,
            "farmland" | "farm" | "orchard" | "vineyard" => self.farmland += count,
            "water" | "basin" | "reservoir" => self.water += count,
            _ => {}
        }
    }

    /// Fold a raw `natural=*` value.
    pub fn tally_natural(&mut self, value: &str, count: u32) {
        match value {
            "water" | "wetland" => self.water += count,
            "wood" | "forest" => self.forest += count,
            _ => {}
        }
    }

    /// Fold a raw `highway=*` value into the major/minor road tallies.
    pub fn tally_highway(&mut self, value: &str, count: u32) {
        match value {
            "motorway" | "trunk" | "primary" => self.road_major += count,
            "secondary" | "tertiary" | "residential" | "service" | "unclassified" => {
                self.road_minor += count
            }
            _ => {}
        }
    }

    /// Build the full vector from raw per-key value counts.
    pub fn from_raw(
        landuse: &BTreeMap<String, u32>,
        natural: &BTreeMap<String, u32>,
        highway: &BTreeMap<String, u32>,
        building_count: u32,
    ) -> Self {
        let mut counts = Self::default();
        for (value, n) in landuse {
            counts.tally_landuse(value, *n);
        }
        for (value, n) in natural {
            counts.tally_natural(value, *n);
        }
        for (value, n) in highway {
            counts.tally_highway(value, *n);
        }
        counts.building = building_count;
        counts
    }
}

/// Decision table over the category tallies, evaluated top to bottom.
///
/// The branch order is load-bearing: a block that is both commercial and
/// residential reads as commercial, and only a tally that matches no
/// branch falls through to mixed urban.
pub fn place_type(c: &LanduseCounts) -> PlaceType {
    if c.retail + c.commercial > 5 && c.road_major >= 1 {
        PlaceType::UrbanCommercial
    } else if c.residential + c.building > 20 && c.road_minor > 3 {
        PlaceType::UrbanResidential
    } else if c.park + c.forest > 5 && c.building < 10 {
        PlaceType::Parkland
    } else if c.farmland > 3 && c.building < 5 {
        PlaceType::RuralFarmland
    } else if c.industrial > 2 {
        PlaceType::Industrial
    } else {
        PlaceType::MixedUrban
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commercial_strip() {
        let c = LanduseCounts {
            retail: 4,
            commercial: 3,
            road_major: 1,
            ..Default::default()
        };
        assert_eq!(place_type(&c), PlaceType::UrbanCommercial);
    }

    #[test]
    fn residential_block() {
        let c = LanduseCounts {
            residential: 5,
            building: 25,
            road_minor: 6,
            ..Default::default()
        };
        assert_eq!(place_type(&c), PlaceType::UrbanResidential);
    }

    #[test]
    fn park_with_few_buildings() {
        let c = LanduseCounts {
            park: 4,
            forest: 3,
            building: 2,
            ..Default::default()
        };
        assert_eq!(place_type(&c), PlaceType::Parkland);
    }

    #[test]
    fn farmland_and_industry() {
        let farm = LanduseCounts {
            farmland: 5,
            building: 1,
            ..Default::default()
        };
        assert_eq!(place_type(&farm), PlaceType::RuralFarmland);

        let works = LanduseCounts {
            industrial: 3,
            ..Default::default()
        };
        assert_eq!(place_type(&works), PlaceType::Industrial);
    }

    #[test]
    fn empty_tallies_are_mixed_urban() {
        assert_eq!(place_type(&LanduseCounts::default()), PlaceType::MixedUrban);
    }

    #[test]
    fn synonyms_fold_into_categories() {
        let mut landuse = BTreeMap::new();
        landuse.insert("grass".to_string(), 2);
        landuse.insert("meadow".to_string(), 1);
        landuse.insert("orchard".to_string(), 4);
        let mut natural = BTreeMap::new();
        natural.insert("wetland".to_string(), 1);
        let mut highway = BTreeMap::new();
        highway.insert("primary".to_string(), 2);
        highway.insert("service".to_string(), 5);

        let c = LanduseCounts::from_raw(&landuse, &natural, &highway, 3);
        assert_eq!(c.park, 3);
        assert_eq!(c.farmland, 4);
        assert_eq!(c.water, 1);
        assert_eq!(c.road_major, 2);
        assert_eq!(c.road_minor, 5);
        assert_eq!(c.building, 3);
    }
}
