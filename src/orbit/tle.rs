use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use super::error::{ElementsError, PropagationError};
use super::propagator::{Propagator, StateVector};

/// A satellite described by a two-line element set, propagated with SGP4.
pub struct TleSatellite {
    pub name: String,
    pub norad_id: u64,
    pub epoch: DateTime<Utc>,
    elements: Elements,
    constants: Constants,
}

impl TleSatellite {
    pub fn from_tle(name: Option<String>, line1: &str, line2: &str) -> Result<Self, ElementsError> {
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())?;
        let constants = Constants::from_elements(&elements)?;
        if !(elements.mean_motion.is_finite() && elements.mean_motion > 0.0) {
            return Err(ElementsError::Orbit(format!(
                "mean motion must be positive, got {}",
                elements.mean_motion
            )));
        }

        let name = elements
            .object_name
            .clone()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

        Ok(Self {
            name,
            norad_id: elements.norad_id,
            epoch: elements.datetime.and_utc(),
            elements,
            constants,
        })
    }
}

impl Propagator for TleSatellite {
    fn propagate(&self, time: DateTime<Utc>) -> Result<StateVector, PropagationError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .map_err(|e| PropagationError::Epoch {
                time,
                message: e.to_string(),
            })?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PropagationError::Model {
                time,
                message: e.to_string(),
            })?;

        let finite = prediction
            .position
            .iter()
            .chain(prediction.velocity.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(PropagationError::Model {
                time,
                message: "non-finite state vector".to_string(),
            });
        }

        Ok(StateVector {
            position_km: prediction.position,
            velocity_km_s: prediction.velocity,
        })
    }
}
