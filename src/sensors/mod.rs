mod fusion;
mod types;

pub use fusion::{FusionOutcome, SensorFusion};
pub use types::{LocationFix, OrientationSample, SatelliteReading, Vec3};
