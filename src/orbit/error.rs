use chrono::{DateTime, Utc};
use thiserror::Error;

/// Rejected at ingestion; the element set never reaches a propagator.
#[derive(Debug, Error)]
pub enum ElementsError {
    #[error("invalid tle: {0}")]
    Tle(#[from] sgp4::TleError),
    #[error("invalid elements: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("invalid orbit: {0}")]
    Orbit(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum PropagationError {
    #[error("time {time} cannot be expressed relative to the element epoch: {message}")]
    Epoch { time: DateTime<Utc>, message: String },
    #[error("propagation failed at {time}: {message}")]
    Model { time: DateTime<Utc>, message: String },
    #[error("time {time} is outside the element validity window")]
    OutOfValidity { time: DateTime<Utc> },
}
