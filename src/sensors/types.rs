use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Raw three-axis sensor vector, device frame.
pub type Vec3 = Vector3<f64>;

/// One entry of a satellite status report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteReading {
    pub id: u32,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    /// Carrier-to-noise density, dB-Hz
    pub cn0_dbhz: f64,
    #[serde(default)]
    pub used_in_fix: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
    /// Milliseconds since the Unix epoch, UTC
    pub timestamp_ms: i64,
    /// True course over ground
    #[serde(default)]
    pub bearing_deg: f64,
    #[serde(default)]
    pub speed: f64,
}

impl LocationFix {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

/// An orientation update; either half may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationSample {
    pub accel: Option<Vec3>,
    pub mag: Option<Vec3>,
}

impl OrientationSample {
    pub fn accel(v: Vec3) -> Self {
        Self {
            accel: Some(v),
            mag: None,
        }
    }

    pub fn mag(v: Vec3) -> Self {
        Self {
            accel: None,
            mag: Some(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_time_is_utc() {
        let fix = LocationFix {
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            timestamp_ms: 3_723_000,
            bearing_deg: 0.0,
            speed: 0.0,
        };
        assert_eq!(
            fix.time().unwrap().to_rfc3339(),
            "1970-01-01T01:02:03+00:00"
        );
    }
}
