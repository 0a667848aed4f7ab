//! Great-circle distance on a spherical Earth.

/// Nautical miles per degree of arc.
const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;
/// Statute miles per nautical mile, rounded.
const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.1515;
const KILOMETERS_PER_STATUTE_MILE: f64 = 1.609344;

/// Distance in kilometers between two latitude/longitude pairs given in degrees.
///
/// Uses the spherical law of cosines. Identical coordinates short-circuit to
/// exactly zero, and the cosine term is clamped to `[-1, 1]` so rounding never
/// pushes `acos` out of its domain. The result is finite, non-negative and
/// symmetric in its two points.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let cos_angle = cos_central_angle(lat1, lon1, lat2, lon2);
    let angle = cos_angle.clamp(-1.0, 1.0).acos().to_degrees();

    angle
        * NAUTICAL_MILES_PER_DEGREE
        * STATUTE_MILES_PER_NAUTICAL_MILE
        * KILOMETERS_PER_STATUTE_MILE
}

/// Cosine of the central angle; may land just outside `[-1, 1]`.
fn cos_central_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let rlat1 = lat1.to_radians();
    let rlat2 = lat2.to_radians();
    let rtheta = (lon1 - lon2).to_radians();

    rlat1.sin() * rlat2.sin() + rlat1.cos() * rlat2.cos() * rtheta.cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackPoint;
    use geo::{Distance as _, Haversine, Point};

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(45.7, 12.3, 45.7, 12.3), 0.0);
        assert_eq!(distance_km(-90.0, 0.0, -90.0, 0.0), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ((45.6931, 12.3478), (45.7001, 12.3512)),
            ((51.5074, -0.1278), (48.8566, 2.3522)),
            ((-33.8688, 151.2093), (40.7128, -74.0060)),
            ((0.0, 0.0), (0.0, 179.9999)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            assert_eq!(
                distance_km(lat1, lon1, lat2, lon2),
                distance_km(lat2, lon2, lat1, lon1)
            );
        }
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 60 * 1.1515 * 1.609344 km per degree
        let dist = distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111.189_576_96).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_overshoot_is_clamped() {
        // adjacent longitudes where the cosine term rounds above 1.0
        let (lat, lon1, lon2) = (-79.84, 12.02, 12.020_000_000_000_001);
        assert!(cos_central_angle(lat, lon1, lat, lon2) > 1.0);

        let dist = distance_km(lat, lon1, lat, lon2);
        assert!(dist.is_finite());
        assert!(dist >= 0.0);
        assert!(dist < 1e-3);
    }

    #[test]
    fn test_near_identical_points_do_not_produce_nan() {
        let dist = distance_km(45.0, 12.0, 45.0, 12.000_000_000_1);
        assert!(dist.is_finite());
        assert!(dist >= 0.0);
        assert!(dist < 1e-3);

        let dist = distance_km(89.999_999_9, 0.0, 89.999_999_9, 1e-12);
        assert!(dist.is_finite());
        assert!(dist >= 0.0);
    }

    #[test]
    fn test_antipodal_points() {
        let dist = distance_km(0.0, 0.0, 0.0, 180.0);
        assert!(dist.is_finite());
        // half the circumference of the legacy sphere
        assert!((dist - 180.0 * 111.189_576_96).abs() < 1e-3);
    }

    #[test]
    fn test_close_to_haversine() {
        // London to Paris, the sphere radii differ by ~0.005%
        let london = TrackPoint::new(51.5074, -0.1278, 11.0);
        let paris = TrackPoint::new(48.8566, 2.3522, 35.0);
        let ours = london.distance_to(&paris);
        let reference = Haversine.distance(Point::from(&london), Point::from(&paris)) / 1000.0;
        assert!((ours - reference).abs() / reference < 1e-3);
    }
}
