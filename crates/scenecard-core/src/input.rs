//! Request input and fail-fast validation.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default map-context query radius in meters.
pub const DEFAULT_RADIUS_M: u32 = 150;

/// Query radii above this are clamped; wide Overpass-style queries get slow
/// and noisy fast.
pub const MAX_RADIUS_M: u32 = 250;

/// Errors in the raw request. All of these are fatal to the request: no
/// card is produced and the caller hears about it immediately.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("heading {0} outside [0, 360]")]
    HeadingOutOfRange(f64),

    #[error("unknown IANA timezone: {0}")]
    UnknownTimezone(String),

    #[error("datetime offset {offset} does not match timezone {timezone} at that instant (expected {expected})")]
    OffsetMismatch {
        timezone: String,
        offset: String,
        expected: String,
    },
}

/// A scene-card construction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRequest {
    pub lat: f64,
    pub lon: f64,
    /// Local wall-clock time carrying its UTC offset.
    pub datetime_local: DateTime<FixedOffset>,
    /// IANA timezone name, e.g. `Europe/Paris`.
    pub timezone: String,
    /// Optional camera heading, clockwise from north.
    #[serde(default)]
    pub heading_deg: Option<f64>,
    /// Optional map-context query radius override.
    #[serde(default)]
    pub radius_m: Option<u32>,
}

impl SceneRequest {
    pub fn new(
        lat: f64,
        lon: f64,
        datetime_local: DateTime<FixedOffset>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            lat,
            lon,
            datetime_local,
            timezone: timezone.into(),
            heading_deg: None,
            radius_m: None,
        }
    }

    pub fn with_heading(mut self, heading_deg: f64) -> Self {
        self.heading_deg = Some(heading_deg);
        self
    }

    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = Some(radius_m);
        self
    }

    /// The effective query radius, clamped into sane bounds.
    pub fn effective_radius_m(&self) -> u32 {
        self.radius_m.unwrap_or(DEFAULT_RADIUS_M).min(MAX_RADIUS_M)
    }

    /// The local calendar date the request describes.
    pub fn local_date(&self) -> NaiveDate {
        self.datetime_local.date_naive()
    }

    /// Validate ranges, the timezone name, and offset consistency.
    ///
    /// Checked in order: latitude, longitude, heading, zone lookup, then
    /// the invariant that the supplied offset equals the named zone's
    /// offset at that instant. First violation wins.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(InputError::LatitudeOutOfRange(self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(InputError::LongitudeOutOfRange(self.lon));
        }
        if let Some(h) = self.heading_deg {
            if !h.is_finite() || !(0.0..=360.0).contains(&h) {
                return Err(InputError::HeadingOutOfRange(h));
            }
        }

        let tz = Tz::from_str(&self.timezone)
            .map_err(|_| InputError::UnknownTimezone(self.timezone.clone()))?;

        let expected = tz
            .from_utc_datetime(&self.datetime_local.naive_utc())
            .offset()
            .fix();
        if expected != *self.datetime_local.offset() {
            return Err(InputError::OffsetMismatch {
                timezone: self.timezone.clone(),
                offset: self.datetime_local.offset().to_string(),
                expected: expected.to_string(),
            });
        }

        Ok(())
    }
}
