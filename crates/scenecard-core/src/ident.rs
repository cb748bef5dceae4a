//! Scene-card identifiers.

use chrono::{DateTime, Utc};

/// Build the card identifier: `sc_<compact-utc>_<lat:5dp>_<lon:5dp>`.
///
/// Best-effort uniqueness only. The id is a pure function of construction
/// second and coordinates rounded to 5 decimal places (~1.1 m), so two
/// requests in the same second and rounding bucket collide. Callers that
/// need a true primary key must mint their own; this id is a readable
/// retrieval label, not a guarantee.
pub fn scene_id(created_at: DateTime<Utc>, lat: f64, lon: f64) -> String {
    format!(
        "sc_{}_{lat:.5}_{lon:.5}",
        created_at.format("%Y%m%dT%H%M%SZ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_shape() {
        let at = DateTime::parse_from_rfc3339("2025-10-09T11:20:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            scene_id(at, 48.85837, 2.29448),
            "sc_20251009T112000Z_48.85837_2.29448"
        );
    }

    #[test]
    fn negative_coordinates_keep_sign() {
        let at = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            scene_id(at, -33.86882, 151.20929),
            "sc_20250101T000000Z_-33.86882_151.20929"
        );
    }

    #[test]
    fn same_bucket_same_id() {
        let at = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        // differences below 5dp round away
        assert_eq!(
            scene_id(at, 48.858370, 2.294480),
            scene_id(at, 48.858371, 2.294479)
        );
    }
}
