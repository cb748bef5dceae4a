//! Built-in solar position calculator.
//!
//! NOAA's low-precision solar position algorithm: geometric elevation and
//! azimuth (0° = north, clockwise) from latitude, longitude, and instant.
//! Accurate to well under a degree for years 1900–2100, which is far
//! tighter than the lighting-flag windows need. No refraction correction
//! is applied; the flag thresholds are defined on geometric elevation.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Timelike, Utc};

use scenecard_core::{SunFacts, Unavailable};

use super::SolarCalculator;

/// Deterministic in-process solar position provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoaaSolarCalculator;

impl NoaaSolarCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute azimuth/elevation for a point and instant.
    pub fn compute(&self, lat: f64, lon: f64, at: DateTime<FixedOffset>) -> SunFacts {
        let utc = at.with_timezone(&Utc);
        let jd = julian_day(utc);
        let t = (jd - 2451545.0) / 36525.0; // Julian centuries from J2000

        // Geometric mean longitude and anomaly of the sun, degrees.
        let l0 = (280.46646 + t * (36000.76983 + 0.0003032 * t)).rem_euclid(360.0);
        let m = 357.52911 + t * (35999.05029 - 0.0001537 * t);
        let e = 0.016708634 - t * (0.000042037 + 0.0000001267 * t);

        // Equation of center and derived longitudes.
        let m_rad = m.to_radians();
        let c = m_rad.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
            + (2.0 * m_rad).sin() * (0.019993 - 0.000101 * t)
            + (3.0 * m_rad).sin() * 0.000289;
        let true_long = l0 + c;
        let omega = 125.04 - 1934.136 * t;
        let app_long = true_long - 0.00569 - 0.00478 * omega.to_radians().sin();

        // Obliquity of the ecliptic, corrected.
        let mean_obliq = 23.0
            + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0;
        let obliq = mean_obliq + 0.00256 * omega.to_radians().cos();

        // Solar declination.
        let decl = (obliq.to_radians().sin() * app_long.to_radians().sin())
            .asin()
            .to_degrees();

        // Equation of time, minutes.
        let var_y = (obliq.to_radians() / 2.0).tan().powi(2);
        let l0_rad = l0.to_radians();
        let eot = 4.0
            * (var_y * (2.0 * l0_rad).sin() - 2.0 * e * m_rad.sin()
                + 4.0 * e * var_y * m_rad.sin() * (2.0 * l0_rad).cos()
                - 0.5 * var_y * var_y * (4.0 * l0_rad).sin()
                - 1.25 * e * e * (2.0 * m_rad).sin())
            .to_degrees();

        // True solar time and hour angle.
        let minutes = f64::from(utc.hour()) * 60.0
            + f64::from(utc.minute())
            + f64::from(utc.second()) / 60.0;
        let tst = (minutes + eot + 4.0 * lon).rem_euclid(1440.0);
        let mut ha = tst / 4.0 - 180.0;
        if ha < -180.0 {
            ha += 360.0;
        }

        let lat_rad = lat.to_radians();
        let decl_rad = decl.to_radians();
        let ha_rad = ha.to_radians();

        let cos_zenith = (lat_rad.sin() * decl_rad.sin()
            + lat_rad.cos() * decl_rad.cos() * ha_rad.cos())
        .clamp(-1.0, 1.0);
        let zenith = cos_zenith.acos();
        let elevation_deg = 90.0 - zenith.to_degrees();

        // Azimuth from the zenith triangle; hour angle sign picks the side.
        let denom = lat_rad.cos() * zenith.sin();
        let azimuth_deg = if denom.abs() < 1e-9 {
            // sun at zenith or observer at a pole: azimuth is degenerate
            0.0
        } else {
            let cos_az = ((lat_rad.sin() * zenith.cos() - decl_rad.sin()) / denom)
                .clamp(-1.0, 1.0);
            let az = cos_az.acos().to_degrees();
            if ha > 0.0 {
                (az + 180.0).rem_euclid(360.0)
            } else {
                (540.0 - az).rem_euclid(360.0)
            }
        };

        SunFacts {
            azimuth_deg,
            elevation_deg,
        }
    }
}

fn julian_day(t: DateTime<Utc>) -> f64 {
    let seconds = t.timestamp() as f64 + f64::from(t.timestamp_subsec_millis()) / 1000.0;
    seconds / 86400.0 + 2_440_587.5
}

#[async_trait]
impl SolarCalculator for NoaaSolarCalculator {
    async fn position(
        &self,
        lat: f64,
        lon: f64,
        at: DateTime<FixedOffset>,
    ) -> Result<SunFacts, Unavailable> {
        Ok(self.compute(lat, lon, at))
    }

    fn name(&self) -> &str {
        "noaa-spa/0.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn paris_midsummer_midday_sun_is_high() {
        let facts = NoaaSolarCalculator.compute(48.85837, 2.29448, at("2025-06-21T13:00:00+02:00"));
        assert!(facts.elevation_deg > 55.0, "got {}", facts.elevation_deg);
        assert!((0.0..360.0).contains(&facts.azimuth_deg));
    }

    #[test]
    fn paris_midnight_sun_is_below_horizon() {
        let facts = NoaaSolarCalculator.compute(48.85837, 2.29448, at("2025-06-21T01:00:00+02:00"));
        assert!(facts.elevation_deg < -10.0, "got {}", facts.elevation_deg);
    }

    #[test]
    fn morning_sun_sits_east_evening_sun_west() {
        let morning = NoaaSolarCalculator.compute(48.85837, 2.29448, at("2025-06-21T08:00:00+02:00"));
        let evening = NoaaSolarCalculator.compute(48.85837, 2.29448, at("2025-06-21T19:00:00+02:00"));
        assert!(
            morning.azimuth_deg > 45.0 && morning.azimuth_deg < 180.0,
            "morning azimuth {}",
            morning.azimuth_deg
        );
        assert!(
            evening.azimuth_deg > 180.0 && evening.azimuth_deg < 315.0,
            "evening azimuth {}",
            evening.azimuth_deg
        );
    }

    #[test]
    fn southern_hemisphere_noon_sun_faces_north() {
        // Sydney in July: midwinter, sun due north around solar noon.
        let facts =
            NoaaSolarCalculator.compute(-33.86882, 151.20929, at("2025-07-01T12:00:00+10:00"));
        assert!(
            facts.azimuth_deg < 60.0 || facts.azimuth_deg > 300.0,
            "azimuth {}",
            facts.azimuth_deg
        );
        assert!(facts.elevation_deg > 20.0 && facts.elevation_deg < 45.0);
    }

    #[test]
    fn same_instant_same_position() {
        let a = NoaaSolarCalculator.compute(48.85837, 2.29448, at("2025-10-09T13:20:00+02:00"));
        let b = NoaaSolarCalculator.compute(48.85837, 2.29448, at("2025-10-09T13:20:00+02:00"));
        assert_eq!(a, b);
    }
}
