use chrono::{DateTime, Utc};

use crate::geo::{to_topocentric, ObserverLocation, TopocentricView};
use crate::orbit::{PropagationError, Propagator};

/// Elevation of one satellite as seen by one observer, as a function of time.
///
/// Only ever sampled; no derivative is available.
pub struct ElevationFn<'a, P: Propagator + ?Sized> {
    propagator: &'a P,
    observer: &'a ObserverLocation,
}

impl<'a, P: Propagator + ?Sized> ElevationFn<'a, P> {
    pub fn new(propagator: &'a P, observer: &'a ObserverLocation) -> Self {
        Self {
            propagator,
            observer,
        }
    }

    pub fn view_at(&self, time: DateTime<Utc>) -> Result<TopocentricView, PropagationError> {
        let state = self.propagator.propagate(time)?;
        Ok(to_topocentric(state.position_km, self.observer, time))
    }

    pub fn at(&self, time: DateTime<Utc>) -> Result<f64, PropagationError> {
        self.view_at(time).map(|view| view.altitude_deg)
    }
}
