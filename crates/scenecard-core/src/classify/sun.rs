//! Lighting flags derived from solar elevation.

use serde::{Deserialize, Serialize};

/// The four lighting-condition predicates, all derived from one shared
/// elevation value in a fixed order. `is_day` and `is_night` are mutually
/// exclusive by construction; the twilight windows overlap day/night edges
/// but never each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunFlags {
    pub is_day: bool,
    pub is_night: bool,
    pub is_blue_hour: bool,
    pub is_golden_hour: bool,
}

impl SunFlags {
    /// Derive all four flags from an elevation in degrees.
    ///
    /// Windows: day above 0°, night below -6°, blue hour in [-6°, 0°],
    /// golden hour in (0°, 10°].
    pub fn from_elevation(elevation_deg: f64) -> Self {
        let e = elevation_deg;
        let is_day = e > 0.0;
        let is_night = e < -6.0;
        let is_blue_hour = (-6.0..=0.0).contains(&e);
        let is_golden_hour = e > 0.0 && e <= 10.0;
        Self {
            is_day,
            is_night,
            is_blue_hour,
            is_golden_hour,
        }
    }

    /// The single descriptive clause used by the prompt distiller, chosen by
    /// priority: night, then blue hour, then golden hour, then day.
    pub fn lighting_phase(&self) -> &'static str {
        if self.is_night {
            "night"
        } else if self.is_blue_hour {
            "blue hour"
        } else if self.is_golden_hour {
            "golden hour"
        } else if self.is_day {
            "daylight"
        } else {
            // unreachable for real elevations; kept total
            "twilight"
        }
    }
}
