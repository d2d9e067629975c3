mod dipole;
mod wmm;

pub use dipole::DipoleModel;
pub use wmm::WorldMagneticModel;

use crate::sensors::LocationFix;

/// Source of local magnetic declination.
pub trait DeclinationModel {
    /// Declination in degrees, east of true north positive.
    fn declination(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
        time_ms: i64,
    ) -> f64;
}

impl<F> DeclinationModel for F
where
    F: Fn(f64, f64, f64, i64) -> f64,
{
    fn declination(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
        time_ms: i64,
    ) -> f64 {
        self(latitude_deg, longitude_deg, altitude_m, time_ms)
    }
}

/// Treats true and magnetic north as identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeclination;

impl DeclinationModel for NoDeclination {
    fn declination(&self, _: f64, _: f64, _: f64, _: i64) -> f64 {
        0.0
    }
}

/// Offset added to a true bearing to get a magnetic one: the negated declination.
pub fn magnetic_variation(model: &dyn DeclinationModel, fix: &LocationFix) -> f64 {
    -model.declination(fix.latitude, fix.longitude, fix.altitude, fix.timestamp_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix_at(latitude: f64, longitude: f64) -> LocationFix {
        LocationFix {
            latitude,
            longitude,
            altitude: 0.0,
            timestamp_ms: 1_760_000_000_000,
            bearing_deg: 0.0,
            speed: 0.0,
        }
    }

    #[test]
    fn variation_is_negated_declination() {
        let west = |_: f64, _: f64, _: f64, _: i64| -14.5;
        assert_eq!(magnetic_variation(&west, &fix_at(42.5, -70.9)), 14.5);
    }

    #[test]
    fn closure_sees_fix_fields() {
        let echo = |lat: f64, lon: f64, _: f64, _: i64| lat + lon;
        assert_eq!(magnetic_variation(&echo, &fix_at(10.0, 5.0)), -15.0);
    }

    #[test]
    fn no_declination_is_zero() {
        assert_eq!(magnetic_variation(&NoDeclination, &fix_at(42.5, -70.9)), 0.0);
    }
}
