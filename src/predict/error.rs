use thiserror::Error;

use crate::orbit::PropagationError;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("propagation failure: {0}")]
    Propagation(#[from] PropagationError),
    #[error("invalid prediction config: {0}")]
    InvalidConfig(String),
}
