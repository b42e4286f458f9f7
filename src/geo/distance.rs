use super::types::GeodeticPosition;

/// IUGG mean Earth radius.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0088;

/// Great-circle surface distance on a sphere of [`EARTH_MEAN_RADIUS_KM`].
///
/// Uses the atan2 (spherical Vincenty) form of the central angle, which stays
/// well conditioned for both coincident and antipodal points.
pub fn ground_distance_km(a: &GeodeticPosition, b: &GeodeticPosition) -> f64 {
    let (sin_lat1, cos_lat1) = a.lat_rad().sin_cos();
    let (sin_lat2, cos_lat2) = b.lat_rad().sin_cos();
    let (sin_dlon, cos_dlon) = (b.lon_rad() - a.lon_rad()).sin_cos();

    let y1 = cos_lat2 * sin_dlon;
    let y2 = cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_dlon;
    let x = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_dlon;
    EARTH_MEAN_RADIUS_KM * (y1 * y1 + y2 * y2).sqrt().atan2(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_same_point_is_zero() {
        let p = GeodeticPosition::new(30.0, -90.0);
        assert_eq!(ground_distance_km(&p, &p), 0.0);
    }

    #[test]
    fn test_quarter_circumference() {
        let origin = GeodeticPosition::new(0.0, 0.0);
        let d = ground_distance_km(&origin, &GeodeticPosition::new(0.0, 90.0));
        assert!((d - 10_007.0).abs() / 10_007.0 < 0.01, "distance {}", d);
    }

    #[test]
    fn test_symmetric() {
        let berlin = GeodeticPosition::new(52.52, 13.405);
        let cape_town = GeodeticPosition::new(-33.92, 18.42);
        assert_abs_diff_eq!(
            ground_distance_km(&berlin, &cape_town),
            ground_distance_km(&cape_town, &berlin),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_across_antimeridian() {
        let west = GeodeticPosition::new(0.0, 179.5);
        let east = GeodeticPosition::new(0.0, -179.5);
        let expected = EARTH_MEAN_RADIUS_KM * 1.0_f64.to_radians();
        assert_abs_diff_eq!(ground_distance_km(&west, &east), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_antipodes() {
        let half_circumference = EARTH_MEAN_RADIUS_KM * std::f64::consts::PI;
        for &(lat, lon) in &[(10.0, 20.0), (52.52, 13.405), (-33.92, 18.42), (0.0, 0.0)] {
            let a = GeodeticPosition::new(lat, lon);
            let b = GeodeticPosition::new(-lat, lon - 180.0);
            assert_abs_diff_eq!(ground_distance_km(&a, &b), half_circumference, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_nearly_coincident_points() {
        let a = GeodeticPosition::new(52.52, 13.405);
        let b = GeodeticPosition::new(52.52, 13.405 + 1e-6);
        let expected = EARTH_MEAN_RADIUS_KM * 52.52_f64.to_radians().cos() * 1e-6_f64.to_radians();
        assert_abs_diff_eq!(ground_distance_km(&a, &b), expected, epsilon = 1e-9);
    }
}
