use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::geo::GeodeticPosition;
use crate::orbit::PropagationError;

/// Search interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Panics if `start + length` leaves chrono's representable range.
    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Self {
        Self::new(start, start + length)
    }

    /// `None` if the end of the window is not representable.
    pub fn checked_starting_at(start: DateTime<Utc>, length: Duration) -> Option<Self> {
        start
            .checked_add_signed(length)
            .map(|end| Self::new(start, end))
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Rise,
    Culminate,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisibilityEvent {
    pub kind: EventKind,
    pub time: DateTime<Utc>,
    pub elevation_deg: f64,
}

/// One continuous interval above the elevation threshold.
///
/// `truncated_start` / `truncated_end` mark a rise or set that was anchored
/// to the search window boundary because the satellite was already (or still)
/// above the threshold there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pass {
    pub rise: VisibilityEvent,
    pub culmination: VisibilityEvent,
    pub set: VisibilityEvent,
    pub truncated_start: bool,
    pub truncated_end: bool,
}

impl Pass {
    pub fn events(&self) -> [VisibilityEvent; 3] {
        [self.rise, self.culmination, self.set]
    }

    pub fn duration(&self) -> Duration {
        self.set.time - self.rise.time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum SignalClass {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundTrackPoint {
    pub time: DateTime<Utc>,
    pub position: GeodeticPosition,
}

/// Geometry and signal summary of one pass, taken at culmination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassReport {
    pub satellite: String,
    pub norad_id: u64,
    pub rise: DateTime<Utc>,
    pub culmination: DateTime<Utc>,
    pub set: DateTime<Utc>,
    pub duration_seconds: i64,
    pub peak_altitude_deg: f64,
    pub peak_azimuth_deg: f64,
    pub rise_azimuth_deg: f64,
    pub set_azimuth_deg: f64,
    pub range_km: f64,
    pub sub_point: GeodeticPosition,
    pub ground_distance_km: f64,
    pub signal: SignalClass,
    pub ground_track: Vec<GroundTrackPoint>,
    pub truncated_start: bool,
    pub truncated_end: bool,
}

/// A pass that was found but could not be reported.
#[derive(Debug, PartialEq)]
pub struct SkippedPass {
    pub culmination: DateTime<Utc>,
    pub error: PropagationError,
}

/// Everything predicted for one satellite over one window.
#[derive(Debug, Default, PartialEq)]
pub struct SatellitePasses {
    pub reports: Vec<PassReport>,
    pub skipped: Vec<SkippedPass>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::predict::parse_duration;

    #[test]
    fn test_checked_window_rejects_unrepresentable_end() {
        let start = Utc.with_ymd_and_hms(2025, 6, 21, 0, 0, 0).unwrap();
        let huge = parse_duration("300000y").unwrap();
        assert_eq!(TimeWindow::checked_starting_at(start, huge), None);

        let day = TimeWindow::checked_starting_at(start, Duration::hours(24)).unwrap();
        assert_eq!(day, TimeWindow::starting_at(start, Duration::hours(24)));
        assert_eq!(day.length(), Duration::hours(24));
    }
}
