use serde::Serialize;

use crate::render::Point;
use crate::sensors::SatelliteReading;

/// Dot size per dB-Hz of carrier-to-noise density.
const CN0_PER_PIXEL: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DotStyle {
    /// Used in the position solution.
    Filled,
    Outlined,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedSatellite {
    pub id: u32,
    pub position: Point,
    pub radius: f64,
    pub style: DotStyle,
}

/// Distance from the centre for an elevation: zenith at the centre, horizon on
/// the rim. Not clamped, so negative elevations land outside the rim.
pub fn elevation_radius(elevation_deg: f64, circle_radius: f64) -> f64 {
    (90.0 - elevation_deg) * circle_radius / 90.0
}

/// Polar projection of one satellite, azimuth 0 up and increasing clockwise.
pub fn project(reading: &SatelliteReading, center: Point, circle_radius: f64) -> ProjectedSatellite {
    let radius = elevation_radius(reading.elevation_deg, circle_radius);
    let (sin, cos) = reading.azimuth_deg.to_radians().sin_cos();

    ProjectedSatellite {
        id: reading.id,
        position: Point::new(center.x + radius * sin, center.y - radius * cos),
        radius: reading.cn0_dbhz / CN0_PER_PIXEL,
        style: if reading.used_in_fix {
            DotStyle::Filled
        } else {
            DotStyle::Outlined
        },
    }
}

pub fn project_all(
    readings: &[SatelliteReading],
    center: Point,
    circle_radius: f64,
) -> Vec<ProjectedSatellite> {
    readings
        .iter()
        .map(|r| project(r, center, circle_radius))
        .collect()
}
