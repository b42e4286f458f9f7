//! One sweep = pass prediction for every satellite in a catalog snapshot.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rayon::prelude::*;
use thiserror::Error;

use crate::catalog::{Catalog, SatelliteInfo};
use crate::geo::ObserverLocation;
use crate::predict::{predict_passes, PassConfig, PredictError, SatellitePasses, TimeWindow};

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("sweep already running for NORAD {0:?}")]
    AlreadyRunning(Vec<u64>),
    #[error(transparent)]
    Config(#[from] PredictError),
}

/// Result for a single satellite. Failures stay attached to the satellite
/// and never affect the others in the same sweep.
pub struct SatelliteOutcome {
    pub satellite: SatelliteInfo,
    pub result: Result<SatellitePasses, PredictError>,
}

/// Runs sweeps and refuses to let two of them cover the same satellite at once.
#[derive(Clone, Default)]
pub struct Sweeper {
    in_flight: Arc<Mutex<HashSet<u64>>>,
}

struct SweepGuard {
    in_flight: Arc<Mutex<HashSet<u64>>>,
    ids: Vec<u64>,
}

impl Drop for SweepGuard {
    fn drop(&mut self) {
        let mut locked = lock(&self.in_flight);
        for id in &self.ids {
            locked.remove(id);
        }
    }
}

fn lock(set: &Mutex<HashSet<u64>>) -> MutexGuard<'_, HashSet<u64>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Sweeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Predict passes for every catalog entry in parallel.
    ///
    /// Outcomes come back in catalog order.
    pub fn run(
        &self,
        catalog: &Catalog,
        observer: &ObserverLocation,
        window: &TimeWindow,
        config: &PassConfig,
    ) -> Result<Vec<SatelliteOutcome>, SweepError> {
        config.validate()?;
        let _guard = self.claim(catalog.entries().iter().map(|e| e.info.norad_id))?;

        log::info!(
            "Sweeping {} satellites from {} to {}",
            catalog.len(),
            window.start,
            window.end
        );

        let outcomes: Vec<SatelliteOutcome> = catalog
            .entries()
            .par_iter()
            .map(|entry| {
                let result = predict_passes(
                    &entry.info.name,
                    entry.info.norad_id,
                    entry.propagator.as_ref(),
                    observer,
                    window,
                    config,
                );
                match &result {
                    Ok(passes) => log::info!(
                        "{}: {} passes, {} skipped",
                        entry.info.name,
                        passes.reports.len(),
                        passes.skipped.len()
                    ),
                    Err(e) => log::warn!("{}: {}", entry.info.name, e),
                }
                SatelliteOutcome {
                    satellite: entry.info.clone(),
                    result,
                }
            })
            .collect();

        Ok(outcomes)
    }

    fn claim(&self, ids: impl IntoIterator<Item = u64>) -> Result<SweepGuard, SweepError> {
        let ids: Vec<u64> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();
        let mut locked = lock(&self.in_flight);

        let mut busy: Vec<u64> = ids.iter().copied().filter(|id| locked.contains(id)).collect();
        if !busy.is_empty() {
            busy.sort_unstable();
            return Err(SweepError::AlreadyRunning(busy));
        }
        locked.extend(ids.iter().copied());

        Ok(SweepGuard {
            in_flight: self.in_flight.clone(),
            ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::catalog::CatalogEntry;
    use crate::orbit::CircularOrbit;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn entry(name: &str, norad_id: u64, orbit: CircularOrbit) -> CatalogEntry {
        CatalogEntry::new(
            SatelliteInfo {
                name: name.to_string(),
                norad_id,
                source: "synthetic".to_string(),
            },
            orbit,
        )
    }

    fn catalog() -> Catalog {
        let orbit = CircularOrbit::new(epoch(), Duration::minutes(90), 20.0, 0.0).unwrap();
        Catalog::new(vec![
            entry("GOOD-1", 1, orbit.clone()),
            entry("EXPIRED", 2, orbit.clone().with_validity(Duration::hours(3))),
            entry("GOOD-2", 3, orbit.with_phase(90.0)),
        ])
    }

    #[test]
    fn test_failure_is_isolated_per_satellite() {
        let outcomes = Sweeper::new()
            .run(
                &catalog(),
                &ObserverLocation::new(0.0, 0.0),
                &TimeWindow::starting_at(epoch(), Duration::hours(24)),
                &PassConfig::default(),
            )
            .unwrap();

        let names: Vec<_> = outcomes.iter().map(|o| o.satellite.name.as_str()).collect();
        assert_eq!(names, vec!["GOOD-1", "EXPIRED", "GOOD-2"]);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(PredictError::Propagation(_))));
        assert!(!outcomes[2].result.as_ref().unwrap().reports.is_empty());
    }

    #[test]
    fn test_overlapping_sweep_is_refused() {
        let sweeper = Sweeper::new();
        let guard = sweeper.claim([2, 3]).unwrap();

        let result = sweeper.run(
            &catalog(),
            &ObserverLocation::new(0.0, 0.0),
            &TimeWindow::starting_at(epoch(), Duration::hours(1)),
            &PassConfig::default(),
        );
        match result {
            Err(SweepError::AlreadyRunning(ids)) => assert_eq!(ids, vec![2, 3]),
            _ => panic!("expected AlreadyRunning"),
        }

        drop(guard);
        assert!(sweeper
            .run(
                &catalog(),
                &ObserverLocation::new(0.0, 0.0),
                &TimeWindow::starting_at(epoch(), Duration::hours(1)),
                &PassConfig::default(),
            )
            .is_ok());
    }

    #[test]
    fn test_disjoint_claims_coexist() {
        let sweeper = Sweeper::new();
        let _a = sweeper.claim([1, 2]).unwrap();
        let _b = sweeper.clone().claim([3]).unwrap();
        assert!(sweeper.claim([3, 4]).is_err());
    }

    #[test]
    fn test_invalid_config_fails_whole_sweep() {
        let config = PassConfig {
            step: Duration::zero(),
            ..Default::default()
        };
        let result = Sweeper::new().run(
            &catalog(),
            &ObserverLocation::new(0.0, 0.0),
            &TimeWindow::starting_at(epoch(), Duration::hours(1)),
            &config,
        );
        assert!(matches!(result, Err(SweepError::Config(_))));
    }

    #[test]
    fn test_skipped_passes_reach_the_outcome() {
        let raan = crate::geo::sidereal_angle(epoch()).to_degrees();
        let short_lived = CircularOrbit::new(epoch(), Duration::minutes(90), 51.6, raan)
            .unwrap()
            .with_phase(-20.0)
            .with_validity(Duration::minutes(6));
        let catalog = Catalog::new(vec![entry("SHORT", 7, short_lived)]);

        let outcomes = Sweeper::new()
            .run(
                &catalog,
                &ObserverLocation::default(),
                &TimeWindow::starting_at(epoch(), Duration::minutes(6)),
                &PassConfig::default(),
            )
            .unwrap();
        let passes = outcomes[0].result.as_ref().unwrap();
        assert!(passes.reports.is_empty());
        assert_eq!(passes.skipped.len(), 1);
    }
}
