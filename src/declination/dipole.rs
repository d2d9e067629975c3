use super::DeclinationModel;

// IGRF-14 first-degree Gauss coefficients (nT) at epoch 2025.0 and their
// secular variation (nT/year).
const G10: f64 = -29350.0;
const G11: f64 = -1410.3;
const H11: f64 = 4545.5;
const G10_SV: f64 = 12.6;
const G11_SV: f64 = 10.0;
const H11_SV: f64 = -21.5;

/// 2025-01-01T00:00:00Z
const EPOCH_MS: i64 = 1_735_689_600_000;
const MS_PER_YEAR: f64 = 365.25 * 86_400_000.0;

/// Tilted centred dipole approximation of the main field.
///
/// Coarse (errors of ten degrees or more in places) but defined for every
/// time and place, so it backs the World Magnetic Model outside its epoch.
/// Altitude does not change a dipole's declination and is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DipoleModel;

impl DipoleModel {
    fn coefficients(time_ms: i64) -> (f64, f64, f64) {
        let years = time_ms.saturating_sub(EPOCH_MS) as f64 / MS_PER_YEAR;
        (
            G10 + G10_SV * years,
            G11 + G11_SV * years,
            H11 + H11_SV * years,
        )
    }
}

impl DeclinationModel for DipoleModel {
    fn declination(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        _altitude_m: f64,
        time_ms: i64,
    ) -> f64 {
        let (g10, g11, h11) = Self::coefficients(time_ms);
        let colat = (90.0 - latitude_deg).to_radians();
        let (sin_lon, cos_lon) = longitude_deg.to_radians().sin_cos();

        let north = -g10 * colat.sin() + (g11 * cos_lon + h11 * sin_lon) * colat.cos();
        let east = g11 * sin_lon - h11 * cos_lon;
        east.atan2(north).to_degrees()
    }
}
