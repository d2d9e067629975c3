use std::collections::VecDeque;

use crate::sensors::{LocationFix, OrientationSample, SatelliteReading, Vec3};

/// Receiver of sensor, location and satellite updates.
pub trait SkyEvents {
    fn on_orientation_sample(&mut self, accel: Option<Vec3>, mag: Option<Vec3>);
    /// `None` means no fix, or the receiver was switched off.
    fn on_location_fix(&mut self, fix: Option<LocationFix>);
    /// `None` clears the satellite view.
    fn on_satellite_status(&mut self, readings: Option<Vec<SatelliteReading>>);
    /// The platform has no location service at all.
    fn on_location_service_missing(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkyEvent {
    Orientation(OrientationSample),
    Location(Option<LocationFix>),
    SatelliteStatus(Option<Vec<SatelliteReading>>),
    LocationServiceMissing,
}

impl SkyEvent {
    pub fn dispatch(self, sink: &mut dyn SkyEvents) {
        match self {
            SkyEvent::Orientation(sample) => sink.on_orientation_sample(sample.accel, sample.mag),
            SkyEvent::Location(fix) => sink.on_location_fix(fix),
            SkyEvent::SatelliteStatus(readings) => sink.on_satellite_status(readings),
            SkyEvent::LocationServiceMissing => sink.on_location_service_missing(),
        }
    }
}

/// Anything that produces updates: a platform service, a replay file, a test.
pub trait EventSource {
    /// Next pending event, or `None` when nothing is ready right now.
    fn next_event(&mut self) -> Option<SkyEvent>;
}

impl EventSource for VecDeque<SkyEvent> {
    fn next_event(&mut self) -> Option<SkyEvent> {
        self.pop_front()
    }
}

/// Delivers every ready event from `source` to `sink`; returns how many.
pub fn pump(source: &mut dyn EventSource, sink: &mut dyn SkyEvents) -> usize {
    let mut delivered = 0;
    while let Some(event) = source.next_event() {
        event.dispatch(sink);
        delivered += 1;
    }
    delivered
}
