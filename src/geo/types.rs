use serde::Serialize;

use super::{WGS84_A_KM, WGS84_E2};

/// A point on the reference ellipsoid.
///
/// Latitude is clamped to [-90, 90] and longitude wrapped into (-180, 180]
/// whenever a value is built through [`GeodeticPosition::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeodeticPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl GeodeticPosition {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg: latitude_deg.clamp(-90.0, 90.0),
            longitude_deg: wrap_longitude(longitude_deg),
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if lon > -180.0 && lon <= 180.0 {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Fixed ground observer. Altitude defaults to sea level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObserverLocation {
    pub position: GeodeticPosition,
    pub altitude_m: f64,
}

impl Default for ObserverLocation {
    fn default() -> Self {
        Self {
            position: GeodeticPosition::new(0.0, 0.0),
            altitude_m: 0.0,
        }
    }
}

impl ObserverLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            position: GeodeticPosition::new(latitude_deg, longitude_deg),
            altitude_m: 0.0,
        }
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = altitude_m;
        self
    }

    /// Parse `"lat, lon"` as written in station config files.
    pub fn from_coordinates(coordinates: &str, altitude_m: Option<f64>) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat: f64 = parts[0].parse().ok()?;
        let lon: f64 = parts[1].parse().ok()?;
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 {
            return None;
        }
        Some(Self::new(lat, lon).with_altitude(altitude_m.unwrap_or(0.0)))
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.position.lat_rad();
        let lon = self.position.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let sin_lon = lon.sin();
        let cos_lon = lon.cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        let x = (n + alt_km) * cos_lat * cos_lon;
        let y = (n + alt_km) * cos_lat * sin_lon;
        let z = (n * (1.0 - WGS84_E2) + alt_km) * sin_lat;
        [x, y, z]
    }
}

/// Observer-relative view of a satellite at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopocentricView {
    /// Elevation above the local horizon, negative below it.
    pub altitude_deg: f64,
    /// Clockwise from true north, in [0, 360).
    pub azimuth_deg: f64,
    pub range_km: f64,
}
