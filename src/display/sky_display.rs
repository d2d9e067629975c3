use std::sync::Arc;

use super::events::SkyEvents;
use super::snapshot::DisplaySnapshot;
use crate::declination::{magnetic_variation, DeclinationModel};
use crate::notice::{NoticeLength, NoticeQueue};
use crate::sensors::{FusionOutcome, LocationFix, OrientationSample, SatelliteReading, SensorFusion, Vec3};

/// Owner of the latest-value state behind the sky view.
///
/// Every accepted update replaces the snapshot and raises the redraw flag;
/// drawing only ever reads the current snapshot.
pub struct SkyDisplay {
    snapshot: Arc<DisplaySnapshot>,
    fusion: SensorFusion,
    declination: Box<dyn DeclinationModel>,
    notices: NoticeQueue,
    redraw: bool,
}

impl SkyDisplay {
    pub fn new(declination: Box<dyn DeclinationModel>) -> Self {
        Self {
            snapshot: Arc::new(DisplaySnapshot::default()),
            fusion: SensorFusion::new(),
            declination,
            notices: NoticeQueue::new(),
            redraw: false,
        }
    }

    pub fn snapshot(&self) -> Arc<DisplaySnapshot> {
        self.snapshot.clone()
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn notices(&mut self) -> &mut NoticeQueue {
        &mut self.notices
    }

    fn replace(&mut self, update: impl FnOnce(&mut DisplaySnapshot)) {
        let mut next = (*self.snapshot).clone();
        update(&mut next);
        self.snapshot = Arc::new(next);
        self.redraw = true;
    }
}

impl SkyEvents for SkyDisplay {
    fn on_orientation_sample(&mut self, accel: Option<Vec3>, mag: Option<Vec3>) {
        let outcome = self.fusion.push(OrientationSample { accel, mag });
        if let FusionOutcome::Fused(orientation) = outcome {
            log::trace!(
                "Orientation yaw {:.1} pitch {:.1} roll {:.1}",
                orientation.yaw_rad.to_degrees(),
                orientation.pitch_rad.to_degrees(),
                orientation.roll_rad.to_degrees()
            );
            let rotation = orientation.compass_rotation_deg();
            self.replace(|s| s.compass_rotation = Some(rotation));
        }
    }

    fn on_location_fix(&mut self, fix: Option<LocationFix>) {
        let had_fix = self.snapshot.fix.is_some();
        match fix {
            Some(fix) => {
                let variation = magnetic_variation(self.declination.as_ref(), &fix);
                log::debug!(
                    "Fix {:.5},{:.5} bearing {:.1}, magnetic variation {:.2}",
                    fix.latitude,
                    fix.longitude,
                    fix.bearing_deg,
                    variation
                );
                if !had_fix {
                    self.notices.push("turned GPS on", NoticeLength::Short);
                }
                self.replace(|s| {
                    s.fix = Some(fix);
                    s.magnetic_variation = variation;
                });
            }
            None => {
                if had_fix {
                    self.notices.push("turning GPS off", NoticeLength::Short);
                }
                self.replace(|s| {
                    s.fix = None;
                    s.magnetic_variation = 0.0;
                });
            }
        }
    }

    fn on_location_service_missing(&mut self) {
        log::warn!("No location service available");
        self.notices.push("no location service", NoticeLength::Long);
    }

    fn on_satellite_status(&mut self, readings: Option<Vec<SatelliteReading>>) {
        if let Some(readings) = &readings {
            log::debug!(
                "Satellite status: {} tracked, {} used",
                readings.len(),
                readings.iter().filter(|r| r.used_in_fix).count()
            );
        }
        self.replace(|s| s.satellites = readings.map(Arc::from));
    }
}
