//! Propagation boundary. Everything above this module only sees [`Propagator`].

mod circular;
mod error;
mod propagator;
mod tle;

pub use circular::CircularOrbit;
pub use error::{ElementsError, PropagationError};
pub use propagator::{Propagator, StateVector};
pub use tle::TleSatellite;

/// Earth gravitational parameter (WGS-72, as used by SGP4).
pub const MU_KM3_S2: f64 = 398_600.8;
