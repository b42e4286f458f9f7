//! Orbital element ingestion. A [`Catalog`] is an immutable snapshot handed to each sweep.

mod error;
mod loader;
mod parsing;

pub use error::CatalogError;
pub use loader::TleLoader;
pub use parsing::{parse_multi_tle, TleLines, UnpairedLine};

use serde::Serialize;

use crate::orbit::{Propagator, TleSatellite};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u64,
    pub source: String,
}

pub struct CatalogEntry {
    pub info: SatelliteInfo,
    pub propagator: Box<dyn Propagator>,
}

impl CatalogEntry {
    pub fn new(info: SatelliteInfo, propagator: impl Propagator + 'static) -> Self {
        Self {
            info,
            propagator: Box::new(propagator),
        }
    }
}

#[derive(Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse TLE text, failing on the first malformed element set.
    pub fn from_tle_str(content: &str, source: &str) -> Result<Self, CatalogError> {
        let sets = parse_multi_tle(content).map_err(|e| CatalogError::InvalidOrbitalElements {
            file: source.to_string(),
            satellite: e.text.chars().take(24).collect(),
            message: e.to_string(),
        })?;

        let mut entries = Vec::new();
        for (name, line1, line2) in sets {
            let satellite = TleSatellite::from_tle(name.clone(), &line1, &line2).map_err(|e| {
                CatalogError::InvalidOrbitalElements {
                    file: source.to_string(),
                    satellite: name.unwrap_or_else(|| line1.chars().take(7).collect()),
                    message: e.to_string(),
                }
            })?;
            entries.push(CatalogEntry::new(
                SatelliteInfo {
                    name: satellite.name.clone(),
                    norad_id: satellite.norad_id,
                    source: source.to_string(),
                },
                satellite,
            ));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.info.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Keep only the named satellites (case-insensitive), in the order given.
    pub fn select(self, names: &[String]) -> Result<Self, CatalogError> {
        let mut pool = self.entries;
        let mut selected = Vec::new();
        for name in names {
            match pool
                .iter()
                .position(|e| e.info.name.eq_ignore_ascii_case(name.trim()))
            {
                Some(idx) => selected.push(pool.swap_remove(idx)),
                None => log::warn!("Satellite {} not found in catalog", name),
            }
        }
        if selected.is_empty() {
            return Err(CatalogError::NoSatellites);
        }
        Ok(Self { entries: selected })
    }

    pub(crate) fn extend(&mut self, other: Catalog) {
        for entry in other.entries {
            match self
                .entries
                .iter_mut()
                .find(|e| e.info.norad_id == entry.info.norad_id)
            {
                Some(existing) => {
                    log::debug!(
                        "NORAD {} from {} replaces entry from {}",
                        entry.info.norad_id,
                        entry.info.source,
                        existing.info.source
                    );
                    *existing = entry;
                }
                None => self.entries.push(entry),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::orbit::TleSatellite;

    pub const WEATHER_TLE: &str = "
NOAA 15
1 25338U 98030A   24226.52840278  .00000356  00000-0  16542-3 0  9998
2 25338  98.5574 254.7612 0010534 203.5513 156.5168 14.26645463366390

ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
";

    #[test]
    fn test_from_tle_str() {
        let catalog = Catalog::from_tle_str(WEATHER_TLE, "weather.txt").unwrap();
        assert_eq!(catalog.len(), 2);
        let iss = catalog.find("iss (zarya)").unwrap();
        assert_eq!(iss.info.norad_id, 25544);
        assert_eq!(iss.info.source, "weather.txt");
    }

    #[test]
    fn test_malformed_set_fails_fast() {
        let broken = WEATHER_TLE.replace("98.5574", "98.55x4");
        let err = Catalog::from_tle_str(&broken, "weather.txt").err().unwrap();
        match err {
            CatalogError::InvalidOrbitalElements { satellite, file, .. } => {
                assert_eq!(satellite, "NOAA 15");
                assert_eq!(file, "weather.txt");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_corrupted_line_prefix_fails_fast() {
        let broken = WEATHER_TLE.replace("1 25338U", "1x25338U");
        let err = Catalog::from_tle_str(&broken, "weather.txt").err().unwrap();
        match err {
            CatalogError::InvalidOrbitalElements { satellite, file, message } => {
                assert_eq!(satellite, "NOAA 15");
                assert_eq!(file, "weather.txt");
                assert!(message.contains("line 2"), "{}", message);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_truncated_set_fails_fast() {
        let truncated: String = WEATHER_TLE.lines().take(7).collect::<Vec<_>>().join("\n");
        assert!(matches!(
            Catalog::from_tle_str(&truncated, "weather.txt"),
            Err(CatalogError::InvalidOrbitalElements { .. })
        ));
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let catalog = Catalog::from_tle_str(WEATHER_TLE, "weather.txt").unwrap();
        let selected = catalog
            .select(&["ISS (ZARYA)".to_string(), "noaa 15".to_string(), "NOAA 19".to_string()])
            .unwrap();
        let names: Vec<_> = selected.entries().iter().map(|e| e.info.name.as_str()).collect();
        assert_eq!(names, vec!["ISS (ZARYA)", "NOAA 15"]);
    }

    #[test]
    fn test_select_nothing_is_an_error() {
        let catalog = Catalog::from_tle_str(WEATHER_TLE, "weather.txt").unwrap();
        assert!(matches!(
            catalog.select(&["METEOR-M 2".to_string()]),
            Err(CatalogError::NoSatellites)
        ));
    }

    #[test]
    fn test_extend_replaces_same_norad_id() {
        let mut catalog = Catalog::from_tle_str(WEATHER_TLE, "old.txt").unwrap();
        let (name, l1, l2) = parse_multi_tle(WEATHER_TLE).unwrap().remove(1);
        let newer = Catalog::new(vec![CatalogEntry::new(
            SatelliteInfo {
                name: "ISS".into(),
                norad_id: 25544,
                source: "new.txt".into(),
            },
            TleSatellite::from_tle(name, &l1, &l2).unwrap(),
        )]);
        catalog.extend(newer);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("ISS").unwrap().info.source, "new.txt");
    }
}
