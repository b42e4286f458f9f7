use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::error::CatalogError;
use crate::catalog::Catalog;

/// Builds a [`Catalog`] from TLE files and directories on disk.
pub struct TleLoader {
    paths: Vec<PathBuf>,
}

impl TleLoader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Load every configured path.
    ///
    /// A file named directly must parse cleanly. Inside a directory, every
    /// `.tle` / `.txt` file is tried and broken ones are skipped with a warning.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::default();

        for path in &self.paths {
            if path.is_dir() {
                catalog.extend(self.load_dir(path)?);
            } else if path.is_file() {
                catalog.extend(parse_tle_file(path)?);
            } else {
                return Err(CatalogError::NotFound(path.display().to_string()));
            }
        }

        if catalog.is_empty() {
            return Err(CatalogError::NoSatellites);
        }
        log::info!("Loaded {} satellites", catalog.len());
        Ok(catalog)
    }

    fn load_dir(&self, dir: &Path) -> Result<Catalog, CatalogError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_tle = path
                .extension()
                .map(|ext| ext == "tle" || ext == "txt")
                .unwrap_or(false);
            if path.is_file() && is_tle {
                files.push(path);
            }
        }
        files.sort();

        let mut catalog = Catalog::default();
        for path in files {
            match parse_tle_file(&path) {
                Ok(parsed) => catalog.extend(parsed),
                Err(e) => {
                    log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
                }
            }
        }
        Ok(catalog)
    }
}

fn parse_tle_file(path: &Path) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    Catalog::from_tle_str(&content, &filename)
}
