use chrono::{DateTime, Datelike};
use world_magnetic_model::time::Date;
use world_magnetic_model::uom::si::angle::degree;
use world_magnetic_model::uom::si::f32::{Angle, Length};
use world_magnetic_model::uom::si::length::meter;
use world_magnetic_model::GeomagneticField;

use super::{DeclinationModel, DipoleModel};

/// Declination from the World Magnetic Model.
///
/// The model only covers its five-year epoch and a band of altitudes around
/// the surface. Outside that range the dipole approximation is used instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldMagneticModel {
    fallback: DipoleModel,
}

impl WorldMagneticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// WMM declination in degrees, or `None` outside the model's range.
    pub fn evaluate(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
        time_ms: i64,
    ) -> Option<f64> {
        let time = DateTime::from_timestamp_millis(time_ms)?;
        let ordinal = u16::try_from(time.ordinal()).ok()?;
        let date = Date::from_ordinal_date(time.year(), ordinal).ok()?;

        let field = GeomagneticField::new(
            Length::new::<meter>(altitude_m as f32),
            Angle::new::<degree>(latitude_deg as f32),
            Angle::new::<degree>(longitude_deg as f32),
            date,
        )
        .ok()?;
        Some(f64::from(field.declination().get::<degree>()))
    }
}

impl DeclinationModel for WorldMagneticModel {
    fn declination(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
        time_ms: i64,
    ) -> f64 {
        match self.evaluate(latitude_deg, longitude_deg, altitude_m, time_ms) {
            Some(declination) => declination,
            None => {
                log::debug!(
                    "Fix at {:.3},{:.3} ({} m, t={} ms) is outside the WMM range, using the dipole",
                    latitude_deg,
                    longitude_deg,
                    altitude_m,
                    time_ms
                );
                self.fallback
                    .declination(latitude_deg, longitude_deg, altitude_m, time_ms)
            }
        }
    }
}
