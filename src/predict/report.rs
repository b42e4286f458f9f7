use crate::geo::{ground_distance_km, to_sub_point, to_topocentric, ObserverLocation};
use crate::orbit::{PropagationError, Propagator};
use crate::predict::config::PassConfig;
use crate::predict::elevation::ElevationFn;
use crate::predict::types::{GroundTrackPoint, Pass, PassReport};

/// Build the culmination report for one pass.
pub fn build_report<P: Propagator + ?Sized>(
    satellite: &str,
    norad_id: u64,
    propagator: &P,
    observer: &ObserverLocation,
    pass: &Pass,
    config: &PassConfig,
) -> Result<PassReport, PropagationError> {
    let elevation = ElevationFn::new(propagator, observer);
    let culmination = pass.culmination.time;

    let state = propagator.propagate(culmination)?;
    let view = to_topocentric(state.position_km, observer, culmination);
    let sub_point = to_sub_point(state.position_km, culmination);
    let ground_distance = ground_distance_km(&observer.position, &sub_point);

    let rise_view = elevation.view_at(pass.rise.time)?;
    let set_view = elevation.view_at(pass.set.time)?;

    let ground_track = config
        .ground_track
        .offsets()
        .into_iter()
        .map(|offset| {
            let time = culmination + offset;
            let state = propagator.propagate(time)?;
            Ok(GroundTrackPoint {
                time,
                position: to_sub_point(state.position_km, time),
            })
        })
        .collect::<Result<Vec<_>, PropagationError>>()?;

    Ok(PassReport {
        satellite: satellite.to_string(),
        norad_id,
        rise: pass.rise.time,
        culmination,
        set: pass.set.time,
        duration_seconds: pass.duration().num_seconds(),
        peak_altitude_deg: view.altitude_deg,
        peak_azimuth_deg: view.azimuth_deg,
        rise_azimuth_deg: rise_view.azimuth_deg,
        set_azimuth_deg: set_view.azimuth_deg,
        range_km: view.range_km,
        sub_point,
        ground_distance_km: ground_distance,
        signal: config.signal.classify(view.altitude_deg),
        ground_track,
        truncated_start: pass.truncated_start,
        truncated_end: pass.truncated_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::geo::sidereal_angle;
    use crate::orbit::CircularOrbit;
    use crate::predict::pass_finder::find_passes;
    use crate::predict::types::{SignalClass, TimeWindow};

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn overhead_orbit() -> CircularOrbit {
        let raan = sidereal_angle(epoch()).to_degrees();
        CircularOrbit::new(epoch(), Duration::minutes(90), 51.6, raan)
            .unwrap()
            .with_phase(-20.0)
    }

    #[test]
    fn test_report_for_overhead_pass() {
        let sat = overhead_orbit();
        let observer = ObserverLocation::new(0.0, -1.0);
        let config = PassConfig::default();
        let window = TimeWindow::starting_at(epoch(), Duration::minutes(20));
        let passes = find_passes(&ElevationFn::new(&sat, &observer), &window, &config).unwrap();
        assert_eq!(passes.len(), 1);

        let report = build_report("TESTSAT", 99999, &sat, &observer, &passes[0], &config).unwrap();
        assert_eq!(report.satellite, "TESTSAT");
        assert_eq!(report.culmination, passes[0].culmination.time);
        assert!(report.peak_altitude_deg > 60.0);
        assert_eq!(report.signal, SignalClass::Strong);
        // Sub-point is close to the observer for a near-zenith pass.
        assert!(report.ground_distance_km < 300.0, "distance {}", report.ground_distance_km);
        assert!(report.range_km > 250.0);
        assert!(report.duration_seconds > 0);

        assert_eq!(report.ground_track.len(), 6);
        let offsets: Vec<i64> = report
            .ground_track
            .iter()
            .map(|p| (p.time - report.culmination).num_minutes())
            .collect();
        assert_eq!(offsets, vec![-5, -3, -1, 1, 3, 5]);
        // Prograde orbit: track heads north-east through the ascending node.
        let first = report.ground_track.first().unwrap().position;
        let last = report.ground_track.last().unwrap().position;
        assert!(first.latitude_deg < last.latitude_deg);
    }

    #[test]
    fn test_ground_track_failure_is_reported() {
        // Elements expire one minute after culmination, inside the track span.
        let sat = overhead_orbit().with_validity(Duration::minutes(6));
        let observer = ObserverLocation::new(0.0, 0.0);
        let config = PassConfig::default();
        let window = TimeWindow::starting_at(epoch(), Duration::minutes(6));
        let passes = find_passes(&ElevationFn::new(&sat, &observer), &window, &config).unwrap();
        assert_eq!(passes.len(), 1);

        let result = build_report("TESTSAT", 1, &sat, &observer, &passes[0], &config);
        assert!(matches!(result, Err(PropagationError::OutOfValidity { .. })));
    }
}
