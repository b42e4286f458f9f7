use std::f64::consts::TAU;

use chrono::{DateTime, Duration, Utc};

use super::error::{ElementsError, PropagationError};
use super::propagator::{Propagator, StateVector};
use super::MU_KM3_S2;
use crate::geo::WGS84_A_KM;

/// Unperturbed circular orbit defined directly in the TEME frame.
///
/// Handy when a scenario needs an orbit whose geometry is known exactly.
#[derive(Debug, Clone)]
pub struct CircularOrbit {
    epoch: DateTime<Utc>,
    radius_km: f64,
    mean_motion_rad_s: f64,
    inclination_rad: f64,
    raan_rad: f64,
    /// Argument of latitude at epoch.
    phase_rad: f64,
    validity: Option<Duration>,
}

impl CircularOrbit {
    pub fn new(
        epoch: DateTime<Utc>,
        period: Duration,
        inclination_deg: f64,
        raan_deg: f64,
    ) -> Result<Self, ElementsError> {
        let period_s = period.num_milliseconds() as f64 / 1000.0;
        if !(period_s.is_finite() && period_s > 0.0) {
            return Err(ElementsError::Orbit(format!(
                "period must be positive, got {}s",
                period_s
            )));
        }
        if !(0.0..=180.0).contains(&inclination_deg) {
            return Err(ElementsError::Orbit(format!(
                "inclination {} outside [0, 180]",
                inclination_deg
            )));
        }

        let mean_motion_rad_s = TAU / period_s;
        let radius_km = (MU_KM3_S2 / (mean_motion_rad_s * mean_motion_rad_s)).cbrt();
        if radius_km <= WGS84_A_KM {
            return Err(ElementsError::Orbit(format!(
                "orbit radius {:.1} km is inside the Earth",
                radius_km
            )));
        }

        Ok(Self {
            epoch,
            radius_km,
            mean_motion_rad_s,
            inclination_rad: inclination_deg.to_radians(),
            raan_rad: raan_deg.to_radians(),
            phase_rad: 0.0,
            validity: None,
        })
    }

    pub fn with_phase(mut self, argument_of_latitude_deg: f64) -> Self {
        self.phase_rad = argument_of_latitude_deg.to_radians();
        self
    }

    /// Refuse to propagate further than `validity` from the epoch, like an expired element set.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = Some(validity);
        self
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

impl Propagator for CircularOrbit {
    fn propagate(&self, time: DateTime<Utc>) -> Result<StateVector, PropagationError> {
        let elapsed = time - self.epoch;
        if let Some(validity) = self.validity {
            if elapsed.abs() > validity {
                return Err(PropagationError::OutOfValidity { time });
            }
        }

        let dt_s = elapsed
            .num_microseconds()
            .map(|us| us as f64 * 1e-6)
            .ok_or_else(|| PropagationError::Epoch {
                time,
                message: "offset from epoch overflows".to_string(),
            })?;

        let u = self.phase_rad + self.mean_motion_rad_s * dt_s;
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_i, cos_i) = self.inclination_rad.sin_cos();
        let (sin_o, cos_o) = self.raan_rad.sin_cos();
        let r = self.radius_km;
        let v = r * self.mean_motion_rad_s;

        Ok(StateVector {
            position_km: [
                r * (cos_o * cos_u - sin_o * sin_u * cos_i),
                r * (sin_o * cos_u + cos_o * sin_u * cos_i),
                r * sin_u * sin_i,
            ],
            velocity_km_s: [
                v * (-cos_o * sin_u - sin_o * cos_u * cos_i),
                v * (-sin_o * sin_u + cos_o * cos_u * cos_i),
                v * cos_u * sin_i,
            ],
        })
    }
}
