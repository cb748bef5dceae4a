//! Dominant road classification.

use crate::card::RoadType;

/// Rank for picking the dominant road class: the most structurally
/// significant class present wins, independent of how many ways carry it.
fn rank(road: RoadType) -> u8 {
    match road {
        RoadType::Motorway => 0,
        RoadType::Trunk => 1,
        RoadType::Primary => 2,
        RoadType::Secondary => 3,
        RoadType::Tertiary => 4,
        RoadType::Residential => 5,
        RoadType::Pedestrian => 6,
        RoadType::Service => 7,
        RoadType::Unclassified => 8,
    }
}

/// Map a raw `highway=*` value onto the road enum, if it names a road.
pub fn road_type_from_tag(value: &str) -> Option<RoadType> {
    match value {
        "motorway" | "motorway_link" => Some(RoadType::Motorway),
        "trunk" | "trunk_link" => Some(RoadType::Trunk),
        "primary" | "primary_link" => Some(RoadType::Primary),
        "secondary" | "secondary_link" => Some(RoadType::Secondary),
        "tertiary" | "tertiary_link" => Some(RoadType::Tertiary),
        "residential" | "living_street" => Some(RoadType::Residential),
        "pedestrian" | "footway" => Some(RoadType::Pedestrian),
        "service" => Some(RoadType::Service),
        "unclassified" | "road" => Some(RoadType::Unclassified),
        _ => None,
    }
}

/// Pick the dominant road class from the raw highway tags seen within the
/// query radius. Empty input → None (the card's `road_type` stays null).
pub fn dominant_road_type<'a, I: IntoIterator<Item = &'a str>>(raw_tags: I) -> Option<RoadType> {
    raw_tags
        .into_iter()
        .filter_map(road_type_from_tag)
        .min_by_key(|r| rank(*r))
}
