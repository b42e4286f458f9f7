use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TLE path not found: {0}")]
    NotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid orbital elements for {satellite} in {file}: {message}")]
    InvalidOrbitalElements {
        file: String,
        satellite: String,
        message: String,
    },
    #[error("No satellites loaded")]
    NoSatellites,
}
