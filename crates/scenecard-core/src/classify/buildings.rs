//! Building height and density buckets.

use crate::card::{BuildingDensity, BuildingHeight};

/// Buildings within the query radius at or above this count read as medium
/// density.
pub const MEDIUM_MIN_BUILDINGS: u32 = 10;

/// Buildings within the query radius at or above this count read as dense.
pub const DENSE_MIN_BUILDINGS: u32 = 40;

/// Bucket an estimated story count.
///
/// 1–2 stories → lowrise, 3–6 → midrise, 7+ → highrise. No footprint data
/// (or a nonsensical estimate) → unknown; the bucket never defaults to
/// lowrise.
pub fn building_height(stories: Option<f64>) -> BuildingHeight {
    let Some(s) = stories else {
        return BuildingHeight::Unknown;
    };
    if !s.is_finite() || s < 0.5 {
        return BuildingHeight::Unknown;
    }
    let rounded = s.round() as i64;
    match rounded {
        0..=2 => BuildingHeight::Lowrise,
        3..=6 => BuildingHeight::Midrise,
        _ => BuildingHeight::Highrise,
    }
}

/// Bucket a building footprint count within the query radius.
///
/// Cutpoints are fixed so the same count always yields the same bucket:
/// below [`MEDIUM_MIN_BUILDINGS`] → sparse, below [`DENSE_MIN_BUILDINGS`]
/// → medium, otherwise dense. Unknown count → unknown bucket.
pub fn building_density(count: Option<u32>) -> BuildingDensity {
    match count {
        None => BuildingDensity::Unknown,
        Some(n) if n >= DENSE_MIN_BUILDINGS => BuildingDensity::Dense,
        Some(n) if n >= MEDIUM_MIN_BUILDINGS => BuildingDensity::Medium,
        Some(_) => BuildingDensity::Sparse,
    }
}
