//! Earth-fixed geometry: observer locations, topocentric views and sub-points.

mod distance;
mod transform;
mod types;

pub use distance::{ground_distance_km, EARTH_MEAN_RADIUS_KM};
pub use transform::{
    ecef_to_enu, ecef_to_geodetic, sidereal_angle, teme_to_ecef_position, to_sub_point,
    to_topocentric,
};
pub use types::{GeodeticPosition, ObserverLocation, TopocentricView};

// WGS-84 constants
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_E2: f64 = 0.006_694_379_990_14;
