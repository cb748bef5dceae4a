//! Unit and angle normalization.
//!
//! Providers report angles, temperatures, speeds, and depths in whatever
//! units their APIs grew up with. Everything entering a card goes through
//! these helpers first so the card's canonical units hold: decimal degrees
//! clockwise from north, °C, mm, m/s.

/// Wrap an azimuth or heading into [0, 360).
pub fn normalize_azimuth(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs after rounding
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Clamp a solar elevation into [-90, 90].
pub fn clamp_elevation(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    deg.clamp(-90.0, 90.0)
}

/// Fahrenheit to Celsius.
pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Kilometers per hour to meters per second.
pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh / 3.6
}

/// Miles per hour to meters per second.
pub fn mph_to_mps(mph: f64) -> f64 {
    mph * 0.44704
}

/// Inches to millimeters.
pub fn inches_to_mm(inches: f64) -> f64 {
    inches * 25.4
}

/// Meters to kilometers, for visibility fields.
pub fn meters_to_km(m: f64) -> f64 {
    m / 1000.0
}
