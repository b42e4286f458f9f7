//! Pass visibility and geometry engine.

mod config;
mod elevation;
mod error;
mod pass_finder;
mod report;
mod types;

pub use config::{parse_duration, GroundTrackConfig, PassConfig, SignalThresholds};
pub use elevation::ElevationFn;
pub use error::PredictError;
pub use pass_finder::{find_events, find_passes};
pub use report::build_report;
pub use types::{
    EventKind, GroundTrackPoint, Pass, PassReport, SatellitePasses, SignalClass, SkippedPass,
    TimeWindow, VisibilityEvent,
};

pub(crate) use config::deserialize_duration;

use crate::geo::ObserverLocation;
use crate::orbit::Propagator;

/// Find and report every pass of one satellite within `window`.
///
/// A propagation failure during the search aborts this satellite only. A
/// failure while reporting a single pass drops that pass; it is returned in
/// [`SatellitePasses::skipped`] next to the passes that could be reported.
pub fn predict_passes<P: Propagator + ?Sized>(
    satellite_name: &str,
    norad_id: u64,
    propagator: &P,
    observer: &ObserverLocation,
    window: &TimeWindow,
    config: &PassConfig,
) -> Result<SatellitePasses, PredictError> {
    config.validate()?;

    let elevation = ElevationFn::new(propagator, observer);
    let passes = find_passes(&elevation, window, config)?;

    let mut result = SatellitePasses {
        reports: Vec::with_capacity(passes.len()),
        skipped: Vec::new(),
    };
    for pass in &passes {
        match build_report(satellite_name, norad_id, propagator, observer, pass, config) {
            Ok(report) => result.reports.push(report),
            Err(error) => {
                log::warn!(
                    "Skipping {} pass culminating at {}: {}",
                    satellite_name,
                    pass.culmination.time,
                    error
                );
                result.skipped.push(SkippedPass {
                    culmination: pass.culmination.time,
                    error,
                });
            }
        }
    }

    log::debug!(
        "{}: {} passes above {:.1} deg, {} skipped",
        satellite_name,
        result.reports.len(),
        config.min_elevation_deg,
        result.skipped.len()
    );
    Ok(result)
}
