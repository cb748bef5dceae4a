//! Heuristic classifiers.
//!
//! Every function in this module is pure, stateless, and total: defined for
//! any input, never failing. Bucket cutpoints are fixed constants so the
//! same raw data always classifies the same way across cards.

mod buildings;
mod place;
mod roads;
mod sun;
mod weather;

pub use buildings::{building_density, building_height, DENSE_MIN_BUILDINGS, MEDIUM_MIN_BUILDINGS};
pub use place::{place_type, LanduseCounts};
pub use roads::{dominant_road_type, road_type_from_tag};
pub use sun::SunFlags;
pub use weather::{canonical_condition, wet_ground, WET_PRECIP_MM};
