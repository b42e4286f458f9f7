use chrono::Duration;
use serde::{Deserialize, Deserializer};

use crate::predict::error::PredictError;
use crate::predict::types::SignalClass;

/// Tunables for pass search and reporting. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    /// Visibility threshold in degrees above the horizon.
    pub min_elevation_deg: f64,
    /// Coarse scan step. Must be shorter than the shortest pass of interest.
    #[serde(deserialize_with = "deserialize_duration")]
    pub step: Duration,
    /// Bisection stops once the elevation error is below this.
    pub tolerance_deg: f64,
    pub max_iterations: u32,
    pub signal: SignalThresholds,
    pub ground_track: GroundTrackConfig,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            min_elevation_deg: 10.0,
            step: Duration::seconds(60),
            tolerance_deg: 0.01,
            max_iterations: 60,
            signal: SignalThresholds::default(),
            ground_track: GroundTrackConfig::default(),
        }
    }
}

impl PassConfig {
    pub fn validate(&self) -> Result<(), PredictError> {
        let invalid =
            |msg: String| -> Result<(), PredictError> { Err(PredictError::InvalidConfig(msg)) };

        if !(-90.0..90.0).contains(&self.min_elevation_deg) {
            return invalid(format!(
                "min_elevation_deg {} outside [-90, 90)",
                self.min_elevation_deg
            ));
        }
        if self.step <= Duration::zero() {
            return invalid("step must be positive".into());
        }
        if !(self.tolerance_deg.is_finite() && self.tolerance_deg > 0.0) {
            return invalid(format!("tolerance_deg {} must be positive", self.tolerance_deg));
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be at least 1".into());
        }
        if self.signal.moderate_deg > self.signal.strong_deg {
            return invalid(format!(
                "signal.moderate_deg {} above signal.strong_deg {}",
                self.signal.moderate_deg, self.signal.strong_deg
            ));
        }
        if self.ground_track.step <= Duration::zero() {
            return invalid("ground_track.step must be positive".into());
        }
        if self.ground_track.span < Duration::zero() {
            return invalid("ground_track.span must not be negative".into());
        }
        Ok(())
    }
}

/// Lower bounds (inclusive) of the signal bands, by peak altitude.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub strong_deg: f64,
    pub moderate_deg: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            strong_deg: 60.0,
            moderate_deg: 30.0,
        }
    }
}

impl SignalThresholds {
    pub fn classify(&self, altitude_deg: f64) -> SignalClass {
        if altitude_deg >= self.strong_deg {
            SignalClass::Strong
        } else if altitude_deg >= self.moderate_deg {
            SignalClass::Moderate
        } else {
            SignalClass::Weak
        }
    }
}

/// Sub-points sampled at `-span, -span + step, ...` up to `+span` around culmination.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GroundTrackConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub span: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub step: Duration,
}

impl Default for GroundTrackConfig {
    fn default() -> Self {
        Self {
            span: Duration::minutes(5),
            step: Duration::minutes(2),
        }
    }
}

impl GroundTrackConfig {
    pub fn offsets(&self) -> Vec<Duration> {
        let mut offsets = Vec::new();
        if self.step <= Duration::zero() {
            return offsets;
        }
        let mut offset = -self.span;
        while offset <= self.span {
            offsets.push(offset);
            offset += self.step;
        }
        offsets
    }
}

pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}

pub(crate) fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_bands() {
        let thresholds = SignalThresholds::default();
        assert_eq!(thresholds.classify(75.0), SignalClass::Strong);
        assert_eq!(thresholds.classify(45.0), SignalClass::Moderate);
        assert_eq!(thresholds.classify(10.0), SignalClass::Weak);
        assert_eq!(thresholds.classify(59.999), SignalClass::Moderate);
        assert_eq!(thresholds.classify(60.0), SignalClass::Strong);
        assert_eq!(thresholds.classify(30.0), SignalClass::Moderate);
        assert_eq!(thresholds.classify(29.999), SignalClass::Weak);
    }

    #[test]
    fn test_default_ground_track_offsets() {
        let minutes: Vec<i64> = GroundTrackConfig::default()
            .offsets()
            .iter()
            .map(|d| d.num_minutes())
            .collect();
        assert_eq!(minutes, vec![-5, -3, -1, 1, 3, 5]);
    }

    #[test]
    fn test_zero_span_ground_track() {
        let config = GroundTrackConfig {
            span: Duration::zero(),
            step: Duration::minutes(1),
        };
        assert_eq!(config.offsets(), vec![Duration::zero()]);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(PassConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_signal_thresholds() {
        let config = PassConfig {
            signal: SignalThresholds {
                strong_deg: 20.0,
                moderate_deg: 40.0,
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PredictError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_step() {
        let config = PassConfig {
            step: Duration::zero(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_partial_yaml() {
        let yaml = "min_elevation_deg: 5\nstep: 30s\nground_track:\n  span: 4m\n";
        let config: PassConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.min_elevation_deg, 5.0);
        assert_eq!(config.step, Duration::seconds(30));
        assert_eq!(config.ground_track.span, Duration::minutes(4));
        assert_eq!(config.ground_track.step, Duration::minutes(2));
        assert_eq!(config.signal.strong_deg, 60.0);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_duration(" 90s ").unwrap(), Duration::seconds(90));
        assert!(parse_duration("soon").is_err());
    }
}
