use nalgebra::Matrix3;

use super::types::{OrientationSample, Vec3};

// Below this the horizontal reference is unusable: free fall, or the field
// is nearly parallel to gravity (close to a magnetic pole).
const MIN_HORIZONTAL_NORM: f64 = 0.1;

/// Rotation from device frame to world frame; rows are east, north and up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(pub Matrix3<f64>);

impl RotationMatrix {
    /// Builds the rotation from a gravity (down reference) and a geomagnetic
    /// (north reference) vector. Returns `None` when the pair is degenerate.
    pub fn from_gravity_and_geomag(gravity: Vec3, geomag: Vec3) -> Option<Self> {
        let h = geomag.cross(&gravity);
        let norm_h = h.norm();
        let norm_a = gravity.norm();
        if !(norm_h >= MIN_HORIZONTAL_NORM) || !(norm_a > 0.0) || !norm_h.is_finite() {
            return None;
        }

        let east = h / norm_h;
        let up = gravity / norm_a;
        let north = up.cross(&east);

        Some(Self(Matrix3::from_rows(&[
            east.transpose(),
            north.transpose(),
            up.transpose(),
        ])))
    }

    pub fn orientation(&self) -> Orientation {
        let r = &self.0;
        Orientation {
            yaw_rad: r[(0, 1)].atan2(r[(1, 1)]),
            pitch_rad: (-r[(2, 1)]).asin(),
            roll_rad: (-r[(2, 0)]).atan2(r[(2, 2)]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub roll_rad: f64,
}

impl Orientation {
    /// Angle the compass scene is rotated by: the negated yaw, in degrees.
    pub fn compass_rotation_deg(&self) -> f64 {
        -self.yaw_rad.to_degrees()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FusionOutcome {
    /// Still waiting for the other half of the pair.
    Pending,
    Fused(Orientation),
    /// Both halves were present but could not be combined; both were consumed.
    Degenerate,
}

/// Latest-value slots for the accelerometer and magnetometer.
///
/// A fusion happens once per complete pair; both slots are cleared afterwards,
/// so a lone half waits until its counterpart arrives.
#[derive(Debug, Default)]
pub struct SensorFusion {
    gravity: Option<Vec3>,
    geomag: Option<Vec3>,
}

impl SensorFusion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: OrientationSample) -> FusionOutcome {
        if let Some(accel) = sample.accel {
            self.gravity = Some(accel);
        }
        if let Some(mag) = sample.mag {
            self.geomag = Some(mag);
        }
        self.try_fuse()
    }

    fn try_fuse(&mut self) -> FusionOutcome {
        let (Some(gravity), Some(geomag)) = (self.gravity, self.geomag) else {
            return FusionOutcome::Pending;
        };
        self.gravity = None;
        self.geomag = None;

        match RotationMatrix::from_gravity_and_geomag(gravity, geomag) {
            Some(rotation) => FusionOutcome::Fused(rotation.orientation()),
            None => {
                log::debug!(
                    "Degenerate orientation pair (accel {:?}, mag {:?})",
                    gravity,
                    geomag
                );
                FusionOutcome::Degenerate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> Vec3 {
        Vec3::new(0.0, 0.0, 9.81)
    }

    fn assert_approx_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn fused(outcome: FusionOutcome) -> Orientation {
        match outcome {
            FusionOutcome::Fused(o) => o,
            other => panic!("expected fusion, got {:?}", other),
        }
    }

    #[test]
    fn flat_device_facing_north_has_zero_yaw() {
        let mut fusion = SensorFusion::new();
        assert_eq!(fusion.push(OrientationSample::accel(flat())), FusionOutcome::Pending);
        let o = fused(fusion.push(OrientationSample::mag(Vec3::new(0.0, 22.0, -40.0))));
        assert_approx_eq(o.yaw_rad, 0.0);
        assert_approx_eq(o.pitch_rad, 0.0);
        assert_approx_eq(o.roll_rad, 0.0);
        assert_approx_eq(o.compass_rotation_deg(), 0.0);
    }

    #[test]
    fn flat_device_facing_east_rotates_compass_back() {
        // y axis east, so north lies along -x
        let mut fusion = SensorFusion::new();
        fusion.push(OrientationSample::accel(flat()));
        let o = fused(fusion.push(OrientationSample::mag(Vec3::new(-22.0, 0.0, -40.0))));
        assert_approx_eq(o.yaw_rad.to_degrees(), 90.0);
        assert_approx_eq(o.compass_rotation_deg(), -90.0);
    }

    #[test]
    fn rotation_is_orthonormal_for_a_tilted_device() {
        let gravity = Vec3::new(1.2, -3.4, 9.1);
        let rotation = RotationMatrix::from_gravity_and_geomag(gravity, Vec3::new(5.0, 18.0, -41.0))
            .unwrap()
            .0;
        assert!((rotation * rotation.transpose() - Matrix3::identity()).norm() < 1e-9);
        assert!((rotation.determinant() - 1.0).abs() < 1e-9);
        // the up row is gravity itself, normalised
        assert!((rotation.row(2).transpose() - gravity.normalize()).norm() < 1e-12);
    }

    #[test]
    fn fuses_once_per_complete_pair() {
        let mut fusion = SensorFusion::new();
        assert_eq!(fusion.push(OrientationSample::accel(flat())), FusionOutcome::Pending);
        assert_eq!(fusion.push(OrientationSample::accel(flat())), FusionOutcome::Pending);
        assert!(matches!(
            fusion.push(OrientationSample::mag(Vec3::new(0.0, 22.0, -40.0))),
            FusionOutcome::Fused(_)
        ));
        assert_eq!(
            fusion.push(OrientationSample::mag(Vec3::new(0.0, 22.0, -40.0))),
            FusionOutcome::Pending
        );
    }

    #[test]
    fn sample_with_both_halves_fuses_immediately() {
        let mut fusion = SensorFusion::new();
        let outcome = fusion.push(OrientationSample {
            accel: Some(flat()),
            mag: Some(Vec3::new(0.0, 22.0, -40.0)),
        });
        assert!(matches!(outcome, FusionOutcome::Fused(_)));
    }

    #[test]
    fn collinear_vectors_are_degenerate_and_consumed() {
        let mut fusion = SensorFusion::new();
        fusion.push(OrientationSample::accel(flat()));
        assert_eq!(
            fusion.push(OrientationSample::mag(Vec3::new(0.0, 0.0, -40.0))),
            FusionOutcome::Degenerate
        );
        // the accel half is gone too, so a lone mag only waits
        assert_eq!(
            fusion.push(OrientationSample::mag(Vec3::new(0.0, 22.0, -40.0))),
            FusionOutcome::Pending
        );
    }

    #[test]
    fn non_finite_input_does_not_panic() {
        let mut fusion = SensorFusion::new();
        fusion.push(OrientationSample::accel(Vec3::new(f64::NAN, 0.0, 9.81)));
        assert_eq!(
            fusion.push(OrientationSample::mag(Vec3::new(0.0, 22.0, -40.0))),
            FusionOutcome::Degenerate
        );

        fusion.push(OrientationSample::accel(Vec3::zeros()));
        assert_eq!(
            fusion.push(OrientationSample::mag(Vec3::new(0.0, 22.0, -40.0))),
            FusionOutcome::Degenerate
        );
    }
}
