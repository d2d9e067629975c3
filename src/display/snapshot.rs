use std::sync::Arc;

use crate::sensors::{LocationFix, SatelliteReading};

/// Everything one frame is drawn from.
///
/// Never mutated in place: each update builds a new snapshot and swaps the
/// `Arc`, so a frame always sees a consistent set of values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySnapshot {
    pub fix: Option<LocationFix>,
    /// Added to a true bearing to get a magnetic one (negated declination).
    pub magnetic_variation: f64,
    /// Angle the compass scene is rotated by, negated device yaw in degrees.
    pub compass_rotation: Option<f64>,
    pub satellites: Option<Arc<[SatelliteReading]>>,
}

impl DisplaySnapshot {
    pub fn magnetic_bearing(&self) -> Option<f64> {
        self.fix
            .as_ref()
            .map(|fix| fix.bearing_deg + self.magnetic_variation)
    }
}
