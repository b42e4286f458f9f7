use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::PropagationError;

/// Position and velocity in the TEME frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateVector {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

/// Opaque orbital state that can be evaluated at any instant.
///
/// Implementations must be deterministic for a given time and must fail
/// rather than return stale or zeroed vectors.
pub trait Propagator: Send + Sync {
    fn propagate(&self, time: DateTime<Utc>) -> Result<StateVector, PropagationError>;
}
