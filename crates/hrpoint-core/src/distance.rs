//! Distance conversions shared by validation, the store, and nearby search.

use crate::models::LonLat;
use geo::{Distance, Haversine, Point};

/// Mean earth radius used by the haversine distance
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Meters spanned by one degree of arc on the equator
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Convert a fractional-degree search radius to meters
pub fn delta_to_meters(delta: f64) -> f64 {
    delta * METERS_PER_DEGREE
}

/// Great-circle distance in meters between two `[lon, lat]` coordinates
pub fn haversine_distance_m(a: LonLat, b: LonLat) -> f64 {
    Haversine.distance(Point::new(a[0], a[1]), Point::new(b[0], b[1]))
}

/// Great-circle distance in kilometers between two `[lon, lat]` coordinates
pub fn haversine_distance_km(a: LonLat, b: LonLat) -> f64 {
    haversine_distance_m(a, b) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_delta_to_meters() {
        assert_eq!(delta_to_meters(1.0), METERS_PER_DEGREE);
        assert_eq!(delta_to_meters(0.01), 0.01 * METERS_PER_DEGREE);
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let p = [-47.8982, -22.0023];
        assert_eq!(haversine_distance_km(p, p), 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Campus to Pereire Lopes, roughly 212 m apart
        let a = [-47.898274, -22.002302];
        let b = [-47.900327, -22.002320];
        let meters = haversine_distance_m(a, b);
        assert!((meters - 212.0).abs() < 2.0, "got {}", meters);
    }

    #[test]
    fn test_haversine_uses_lon_lat_order() {
        // One degree of longitude on the equator vs one degree of latitude at 60N
        let equator = haversine_distance_km([0.0, 0.0], [1.0, 0.0]);
        let north = haversine_distance_km([0.0, 60.0], [1.0, 60.0]);
        assert!((equator - 111.19).abs() < 0.1);
        assert!((north - equator / 2.0).abs() < 0.2);
    }

    proptest! {
        #[test]
        fn prop_delta_to_meters_is_deterministic(delta in 0.0f64..1.0) {
            prop_assert_eq!(delta_to_meters(delta), delta_to_meters(delta));
            prop_assert!(delta_to_meters(delta) >= 0.0);
        }

        #[test]
        fn prop_haversine_symmetric(
            lon1 in -180.0f64..180.0, lat1 in -90.0f64..90.0,
            lon2 in -180.0f64..180.0, lat2 in -90.0f64..90.0,
        ) {
            let d1 = haversine_distance_km([lon1, lat1], [lon2, lat2]);
            let d2 = haversine_distance_km([lon2, lat2], [lon1, lat1]);
            prop_assert!((d1 - d2).abs() < 1e-6);
            prop_assert!(d1 <= 20_040.0);
        }
    }
}
