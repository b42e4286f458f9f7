use chrono::{DateTime, Utc};

use super::types::{GeodeticPosition, ObserverLocation, TopocentricView};
use super::{WGS84_A_KM, WGS84_E2};

const GEODETIC_MAX_ITERATIONS: usize = 10;
const GEODETIC_CONVERGENCE_RAD: f64 = 1e-12;

/// Greenwich sidereal angle in radians, used to rotate TEME into ECEF.
pub fn sidereal_angle(time: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()))
}

/// Observer-relative altitude/azimuth of a TEME position.
///
/// A satellite below the horizon yields a negative altitude.
pub fn to_topocentric(
    position_teme_km: [f64; 3],
    observer: &ObserverLocation,
    time: DateTime<Utc>,
) -> TopocentricView {
    let sat_ecef = teme_to_ecef_position(position_teme_km, sidereal_angle(time));
    let sta_ecef = observer.position_ecef_km();

    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let (east, north, up) = ecef_to_enu(
        dr,
        observer.position.lat_rad(),
        observer.position.lon_rad(),
    );
    let azimuth_deg = wrap_azimuth(east.atan2(north).to_degrees());
    // Satellite sitting on the observer: call it overhead.
    let altitude_deg = if range_km > 0.0 {
        (up / range_km).clamp(-1.0, 1.0).asin().to_degrees()
    } else {
        90.0
    };

    TopocentricView {
        altitude_deg,
        azimuth_deg,
        range_km,
    }
}

/// Folds an atan2 angle into [0, 360).
///
/// `rem_euclid` rounds tiny negative inputs up to exactly 360.
fn wrap_azimuth(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Geodetic point directly below a TEME position along the ellipsoid normal.
pub fn to_sub_point(position_teme_km: [f64; 3], time: DateTime<Utc>) -> GeodeticPosition {
    ecef_to_geodetic(teme_to_ecef_position(position_teme_km, sidereal_angle(time)))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// WGS-84 geodetic latitude/longitude of an ECEF point (height discarded).
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> GeodeticPosition {
    let [x, y, z] = ecef;
    let p = (x * x + y * y).sqrt();
    let lon = y.atan2(x);

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..GEODETIC_MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let next = (z + WGS84_E2 * n * sin_lat).atan2(p);
        let delta = (next - lat).abs();
        lat = next;
        if delta < GEODETIC_CONVERGENCE_RAD {
            break;
        }
    }

    GeodeticPosition::new(lat.to_degrees(), lon.to_degrees())
}
